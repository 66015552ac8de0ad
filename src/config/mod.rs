//! Generator configuration: data model, defaults, validation and file loading.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{LoadError, Section, ValidationError, Violation};
pub use loader::{load_config_file, parse_config};
pub use model::{
    Config, ConfigInput, PromptArgument, PromptConfig, PromptInput, PromptRole, ResourceConfig,
    ResourceInput, ResourceLocator, ServerConfig, ServerInput, ToolConfig, ToolInput,
    TransportConfig, TransportInput, TransportKind,
};
pub use validate::{Normalized, normalize};
