use anyhow::Result;
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

mod commands;

#[derive(Parser)]
#[command(name = "dstring-cmd")]
#[command(about = "Command-line utility for exercising null-terminated dynamic strings")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Cap the storage of every string created by the command at this many bytes
    #[arg(long, global = true, value_name = "BYTES")]
    budget: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build "Hello World!" step by step and show the result
    Demo,

    /// Replace occurrences of a pattern
    Replace {
        /// Text to operate on
        text: String,

        /// Pattern to replace
        old: String,

        /// Replacement text
        new: String,

        /// Maximum number of occurrences to replace (0 replaces all)
        #[arg(short, long, default_value_t = 0)]
        count: usize,

        /// Locate occurrences starting from the end of the text
        #[arg(short, long)]
        backward: bool,
    },

    /// Count non-overlapping occurrences of a pattern
    Count {
        /// Text to search
        text: String,

        /// Pattern to count
        needle: String,
    },

    /// Find the byte offset of a pattern
    Find {
        /// Text to search
        text: String,

        /// Pattern to find
        needle: String,

        /// Find the n-th non-overlapping occurrence, counting from 1
        #[arg(short, long, conflicts_with = "reverse")]
        nth: Option<usize>,

        /// Find the last occurrence instead of the first
        #[arg(short, long)]
        reverse: bool,
    },

    /// Erase a byte range
    Erase {
        /// Text to operate on
        text: String,

        /// Byte offset of the first byte to erase
        index: usize,

        /// Number of bytes to erase (0 or omitted erases to the end)
        #[arg(default_value_t = 0)]
        count: usize,
    },

    /// Insert text at a byte offset
    Insert {
        /// Text to operate on
        text: String,

        /// Byte offset to insert at
        index: usize,

        /// Text to insert
        insert: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    let env = commands::Env::new(cli.budget);
    match cli.command {
        Commands::Demo => commands::demo::run(&env),
        Commands::Replace {
            text,
            old,
            new,
            count,
            backward,
        } => commands::replace::run(&env, text, old, new, count, backward),
        Commands::Count { text, needle } => commands::search::count(&env, text, needle),
        Commands::Find {
            text,
            needle,
            nth,
            reverse,
        } => commands::search::find(&env, text, needle, nth, reverse),
        Commands::Erase { text, index, count } => commands::edit::erase(&env, text, index, count),
        Commands::Insert {
            text,
            index,
            insert,
        } => commands::edit::insert(&env, text, index, insert),
    }
}

fn init_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}
