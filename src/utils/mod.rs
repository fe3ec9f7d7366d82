//! Shared helpers for key allocation and URL query manipulation

pub mod keys;
pub mod query;
