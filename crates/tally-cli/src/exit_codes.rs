//! Process exit codes for the tally CLI.

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1; // Missing inputs or any unhandled processing error
