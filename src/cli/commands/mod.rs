//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod completions;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod init;
pub mod list;
pub mod passwd;
pub mod search;
pub mod show;
pub mod strength;
