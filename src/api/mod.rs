pub mod mcp;
pub mod rest;
