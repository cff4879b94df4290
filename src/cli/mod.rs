//! CLI module for vaultrepo
//!
//! Provides command-line interface for:
//! - explain: show how a query method runs, or why it is rejected
//! - query: run one query method over a data file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ParamArg, ReturnsArg};
pub use commands::{explain, parse_sort, query, run, run_command, run_query, QueryRequest};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_data, read_data_file, write_error, write_response, write_text};
