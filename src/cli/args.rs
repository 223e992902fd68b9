//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::tree::OrderBy;

/// Hierarchical modification cost tree: ordered binary tree demo
#[derive(Parser, Debug)]
#[command(name = "modtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Ordering field for the sample tree (overrides config)
    #[arg(short, long, global = true, value_enum)]
    pub order: Option<OrderArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the full feature set over the sample hierarchy
    Demo,

    /// Print the sample tree structure
    Tree,

    /// List the sample tree level by level
    Levels,

    /// Print sorted views of the sample data
    Sorted {
        /// Sort field
        #[arg(value_enum, default_value = "name")]
        field: SortField,

        /// Sort descending instead of ascending
        #[arg(short = 'r', long)]
        descending: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Ordering field of the binary tree, fixed at construction.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Name,
    Priority,
    Cost,
}

impl From<OrderArg> for OrderBy {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Name => OrderBy::Name,
            OrderArg::Priority => OrderBy::Priority,
            OrderArg::Cost => OrderBy::AggregateCost,
        }
    }
}

/// Field for the `sorted` views.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortField {
    Name,
    Priority,
}
