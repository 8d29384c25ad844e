//! Subcommands of the `ctdctl` binary.

pub mod cmd_args;
pub mod cmd_check;
pub mod cmd_get;
pub mod cmd_normalize;
pub mod cmd_relocate;
pub mod cmd_set;
pub mod cmd_show;
pub mod common;
