//! Core types & traits: protocol envelope, error model and tool contracts.

pub mod content;
pub mod error;
pub mod mcp;
pub mod tool;
