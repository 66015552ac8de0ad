//! Application layer - turns CLI options into a validated config and runs the
//! steps around generation (checks, inspector, printed summary and hints)

pub mod checks;
pub mod errors;
pub mod inspector;
pub mod options;
pub mod scaffold;

pub use errors::*;
pub use options::*;
