//! Searchy command-line interface
//!
//! ```text
//! searchy search TERMS... [--google|--bing] [--get] [--max N] [--raw] [--save DIR]
//! searchy get URL... [--strip] [--save DIR]
//! ```
//!
//! In `get`, an argument `-` reads URLs from stdin and `@path` reads them from
//! a file, one per line.

pub mod cli;
pub mod input;

pub use cli::{Cli, Commands, GetArgs, SearchArgs};
pub use input::{expand_targets, InputError};
