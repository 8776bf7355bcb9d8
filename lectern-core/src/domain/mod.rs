//! Pure domain logic with no I/O: progress math and ordering rules.

pub mod ordering;
pub mod progress;
