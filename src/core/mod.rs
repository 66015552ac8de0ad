//! Core helpers shared by the config and generation layers.

pub mod utils;
