use anyhow::Result;

use super::Env;

pub fn count(env: &Env, text: String, needle: String) -> Result<()> {
    let s = env.string_from(&text)?;
    println!("{}", s.count(&needle));
    Ok(())
}

pub fn find(
    env: &Env,
    text: String,
    needle: String,
    nth: Option<usize>,
    reverse: bool,
) -> Result<()> {
    let s = env.string_from(&text)?;
    let found = match (nth, reverse) {
        (Some(n), _) => s.find_nth(&needle, n),
        (None, true) => s.rfind(&needle),
        (None, false) => s.find(&needle),
    };
    match found {
        Some(offset) => println!("{offset}"),
        None => println!("not found"),
    }
    Ok(())
}
