use anyhow::{Context, Result};

use super::Env;

pub fn run(env: &Env) -> Result<()> {
    let mut s = env.new_string();
    s.assign("Hello").context("Failed to assign")?;
    log::debug!("after assign: {s:?}");
    s.append(" World!").context("Failed to append")?;
    log::debug!("after append: {s:?}");

    println!("String: {s}");
    println!("Length: {}", s.len());
    println!("Capacity: {}", s.capacity());
    Ok(())
}
