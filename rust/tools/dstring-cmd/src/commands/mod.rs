//! Command implementations for dstring-cmd

use anyhow::{Context, Result};
use dstring::{Budget, DString};

pub mod demo;
pub mod edit;
pub mod replace;
pub mod search;

/// Settings shared by every command.
pub struct Env {
    budget: Option<Budget>,
}

impl Env {
    pub fn new(budget: Option<usize>) -> Env {
        Env {
            budget: budget.map(Budget::new),
        }
    }

    /// Creates an empty string, charged to the configured budget if there is one.
    pub fn new_string(&self) -> DString {
        match &self.budget {
            Some(budget) => DString::with_budget(budget),
            None => DString::new(),
        }
    }

    /// Creates a string holding `text`, charged to the configured budget if there is
    /// one.
    pub fn string_from(&self, text: &str) -> Result<DString> {
        let result = match &self.budget {
            Some(budget) => DString::from_text_in(text, budget),
            None => DString::from_text(text),
        };
        result.with_context(|| format!("Failed to create a string from {text:?}"))
    }
}

/// Prints the string content on stdout and its storage details to the log.
pub fn print_string(s: &DString) {
    println!("{s}");
    log::info!(
        "length: {}, capacity: {}, floor: {}",
        s.len(),
        s.capacity(),
        s.floor()
    );
}
