//! Subcommands

pub mod check;
pub mod route;
