//! Foundation types for termsim.
//!
//! This crate contains the types shared by all termsim crates: the command
//! schema (definitions and parameter options) and the error type.

pub mod error;
pub mod schema;
