use anyhow::{Context, Result};

use super::{Env, print_string};

pub fn run(
    env: &Env,
    text: String,
    old: String,
    new: String,
    count: usize,
    backward: bool,
) -> Result<()> {
    let mut s = env.string_from(&text)?;
    let replaced = s
        .replace(&old, &new, count, backward)
        .with_context(|| format!("Failed to replace {old:?} with {new:?}"))?;
    log::info!("replaced {replaced} occurrence(s)");
    print_string(&s);
    Ok(())
}
