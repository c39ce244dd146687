use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Find, highlight and step through search matches in article text
#[derive(Parser, Debug)]
#[command(name = "artfind", about = "Find, highlight and step through search matches in article text")]
pub struct Cli {
    /// Match letter case exactly (default: ignore case).
    #[arg(long, default_value_t = false)]
    pub case_sensitive: bool,

    /// Log debug diagnostics to stderr.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Highlight colors: dark or light
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the character offset of every match, one per line
    Find(FindArgs),
    /// Print the text with every match highlighted and one match focused
    Highlight(HighlightArgs),
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Text to search for (matched literally)
    pub query: String,

    /// Article file to search (default: stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// Text to search for (matched literally). Optional with --resume.
    pub query: Option<String>,

    /// Article file to search (default: stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Move the focus this many matches forward (negative: backward),
    /// wrapping around at either end
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub position: i64,

    /// Restore the search saved for this file (stdin: for identical text)
    #[arg(long, default_value_t = false)]
    pub resume: bool,

    /// Save the final search state for this file
    #[arg(long, default_value_t = false)]
    pub save: bool,
}

#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}
