//! Generation infrastructure - template rendering and source formatting

pub mod post_processor;
pub mod template_renderer;

pub use post_processor::*;
pub use template_renderer::*;
