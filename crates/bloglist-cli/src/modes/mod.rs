//! Long-running front-ends.

pub mod shell;
