//! Report module - result tables and files.

mod writer;

pub use writer::*;
