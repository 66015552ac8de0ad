//! mcpgen - scaffold runnable MCP server projects from a declarative config
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod core;
pub mod generation;
pub mod infrastructure;
