//! Pending-change acquisition from the version-control tool.

pub mod cascade;
pub mod runner;

pub use cascade::{CASCADE, DiffResult, DiffStep, get_diff, get_diff_with_runner};
pub use runner::{DefaultRunner, DiffRunner};
