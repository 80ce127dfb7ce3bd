//! Shared walk CLI library.
//!
//! Argument parsing helpers, the interactive prompt flow and output
//! formatting for the `sharedwalk` binary.

pub mod locations;
pub mod output;
pub mod prompt;
pub mod terminal;
