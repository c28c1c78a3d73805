//! Bastion operator console.
//!
//! The `bastion` binary is a thin entry point over these modules, which the
//! integration tests drive directly.

pub mod cli;
pub mod render;
