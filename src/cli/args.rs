//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Query the CED element database: inventory and type hierarchy
#[derive(Parser, Debug)]
#[command(name = "rsced")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (overrides the global config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// CED web server host
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Element database (ced, led, ued)
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Workspace to query
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hierarchy path down to a type
    Lineage {
        /// Type name (case-insensitive)
        type_name: String,
    },

    /// Check whether a type is, or descends from, another type
    IsA {
        /// Ancestor type
        ancestor: String,
        /// Type to test
        descendant: String,
    },

    /// Show the type hierarchy as tree
    Tree {
        /// Only show the subtree below this type
        type_name: Option<String>,
    },

    /// Query inventory elements
    Inventory(InventoryArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Inventory filters, one flag per CED query parameter
#[derive(Args, Debug, Default)]
pub struct InventoryArgs {
    /// Element type (repeatable)
    #[arg(short, long = "type")]
    pub types: Vec<String>,

    /// Zone (repeatable)
    #[arg(short, long)]
    pub zone: Vec<String>,

    /// Property to return (repeatable)
    #[arg(short, long = "property")]
    pub properties: Vec<String>,

    /// Name include pattern (repeatable)
    #[arg(long)]
    pub nx: Vec<String>,

    /// Name exclude pattern (repeatable)
    #[arg(long)]
    pub ng: Vec<String>,

    /// Property existence filter (repeatable)
    #[arg(long)]
    pub ex: Vec<String>,

    /// Property value filter (repeatable)
    #[arg(long)]
    pub ea: Vec<String>,

    /// History date (repeatable)
    #[arg(short, long)]
    pub date: Vec<String>,

    /// Sort order
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Repeat multipass elements
    #[arg(short, long)]
    pub repeat_multipass: bool,

    /// Extra query parameter as KEY=VALUE (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a config template
    Template,
    /// Show the global config file location
    Path,
}
