//! Shared types, errors, and trait seams

pub mod errors;
pub mod traits;
pub mod types;
