use anyhow::{Context, Result};

use super::{Env, print_string};

pub fn erase(env: &Env, text: String, index: usize, count: usize) -> Result<()> {
    let mut s = env.string_from(&text)?;
    s.erase(index, count)
        .with_context(|| format!("Failed to erase {count} bytes at {index}"))?;
    print_string(&s);
    Ok(())
}

pub fn insert(env: &Env, text: String, index: usize, insert: String) -> Result<()> {
    let mut s = env.string_from(&text)?;
    s.insert(index, &insert)
        .with_context(|| format!("Failed to insert {insert:?} at {index}"))?;
    print_string(&s);
    Ok(())
}
