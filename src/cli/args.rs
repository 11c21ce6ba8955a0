//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::TraversalOrder;
use crate::config::RenderStyle;

/// Inspect outline files as trees: render, walk, resolve paths, summarize
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Directory searched for .arbor.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-render every tree of an outline file
    Render {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Override the configured render style
        #[arg(long, value_enum)]
        style: Option<RenderStyle>,
    },

    /// List node values in traversal order, one tree per line
    Walk {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OrderArg::Preorder)]
        order: OrderArg,
    },

    /// Print the path from one node down to another
    Path {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Value of the ancestor node (first preorder match)
        #[arg(long)]
        from: String,

        /// Value of the descendant node (first preorder match)
        #[arg(long)]
        to: String,
    },

    /// Node count, depth and leaf count per tree
    Stats {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

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

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    Preorder,
    Postorder,
    BreadthFirst,
}

impl From<OrderArg> for TraversalOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Preorder => TraversalOrder::Preorder,
            OrderArg::Postorder => TraversalOrder::Postorder,
            OrderArg::BreadthFirst => TraversalOrder::BreadthFirst,
        }
    }
}
