//! wttr.in weather proxy: a REST gateway, a JSON-RPC tool gateway and a
//! supervisor that runs both.

pub mod api;
pub mod cli;
pub mod clients;
pub mod core;
pub mod domain;
pub mod infra;
pub mod tools;
