//! Core type definitions used across the workspace.

pub mod code;
pub mod id;

pub use code::SessionCode;
pub use id::*;
