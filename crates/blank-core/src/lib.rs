//! Shared presentation helpers for the blank workspace.
//!
//! Both the program dump and the execution trace render columns of
//! instruction indices with optional ANSI colors; the pieces they share
//! live here.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod colors;
pub mod utils;


pub use colors::Colors;
