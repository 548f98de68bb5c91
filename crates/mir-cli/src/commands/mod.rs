//! CLI command implementations.

pub mod canonicalize;
pub mod keygen;
pub mod sign;
pub mod verify;
