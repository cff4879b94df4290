//! CLI argument definitions using clap
//!
//! Commands:
//! - vaultrepo explain --method <name> [--param value|sort|limit]... [--returns <shape>] [--json]
//! - vaultrepo query --config <path> --data <path> --method <name> [--arg <v>]... [--sort <prop[:asc|desc]>]... [--limit <n>] [--returns <shape>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::planner::{ParameterKind, ReturnShape};

/// vaultrepo - derived-query repositories over key-addressed secret stores
#[derive(Parser, Debug)]
#[command(name = "vaultrepo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show how a query method would run, or why it is rejected
    Explain {
        /// Method name, e.g. findTop1ByOrderByFirstnameAsc
        #[arg(long)]
        method: String,

        /// Declared parameter kinds, in order
        #[arg(long = "param", value_enum)]
        params: Vec<ParamArg>,

        /// Declared return shape
        #[arg(long, value_enum, default_value_t = ReturnsArg::List)]
        returns: ReturnsArg,

        /// Print the plan as a JSON response instead of text
        #[arg(long)]
        json: bool,
    },

    /// Seed an in-memory store from a data file and run one query method
    Query {
        /// Path to repository configuration file
        #[arg(long, default_value = "./vaultrepo.json")]
        config: PathBuf,

        /// JSON object mapping ids to field records
        #[arg(long)]
        data: PathBuf,

        /// Method name
        #[arg(long)]
        method: String,

        /// Predicate values, in order
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Runtime ordering, `property` or `property:asc|desc`
        #[arg(long = "sort")]
        sort: Vec<String>,

        /// Runtime result cap
        #[arg(long)]
        limit: Option<usize>,

        /// Declared return shape
        #[arg(long, value_enum, default_value_t = ReturnsArg::List)]
        returns: ReturnsArg,
    },
}

/// Parameter kind as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParamArg {
    Value,
    Sort,
    Limit,
}

impl From<ParamArg> for ParameterKind {
    fn from(arg: ParamArg) -> Self {
        match arg {
            ParamArg::Value => ParameterKind::Value,
            ParamArg::Sort => ParameterKind::Sort,
            ParamArg::Limit => ParameterKind::Limit,
        }
    }
}

/// Return shape as written on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReturnsArg {
    List,
    Optional,
    Boolean,
    Count,
}

impl From<ReturnsArg> for ReturnShape {
    fn from(arg: ReturnsArg) -> Self {
        match arg {
            ReturnsArg::List => ReturnShape::List,
            ReturnsArg::Optional => ReturnShape::Optional,
            ReturnsArg::Boolean => ReturnShape::Boolean,
            ReturnsArg::Count => ReturnShape::Count,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
