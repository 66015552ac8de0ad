//! Generation domain module - turns a validated config into a server scaffold
//!
//! The orchestrator checks the output directory, clears the generated
//! subtrees, builds the rendering context and writes every template through
//! the renderer, formatter and output ports defined in [`traits`].

pub mod context;
pub mod errors;
pub mod orchestrator;
pub mod traits;
pub mod types;

pub use context::*;
pub use errors::*;
pub use orchestrator::*;
pub use traits::*;
pub use types::*;
