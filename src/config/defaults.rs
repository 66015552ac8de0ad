//! Default values filled in during normalization.
//!
//! The well-known stub ids (`greet`, `readme`, `welcome`) get hand-written
//! text; any other id gets a generic sentence built from the id.

use crate::config::TransportKind;
use crate::core::utils::title_case_id;

pub const DEFAULT_SERVER_NAME: &str = "example-mcp";
pub const DEFAULT_SERVER_VERSION: &str = "v0.1.0";
pub const DEFAULT_SERVER_DESCRIPTION: &str = "Generated MCP server.";

pub const DEFAULT_TRANSPORT: TransportKind = TransportKind::Stdio;
pub const DEFAULT_HTTP_PORT: i64 = 8080;

pub const DEFAULT_OUTPUT_DIR: &str = "./generated";

pub const DEFAULT_TOOL_ID: &str = "greet";
pub const DEFAULT_PROMPT_ID: &str = "welcome";
pub const DEFAULT_RESOURCE_ID: &str = "readme";

pub const DEFAULT_SCHEMA: &str = r#"{"type":"object"}"#;
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Welcome!";
pub const DEFAULT_RESOURCE_TEXT: &str = "Welcome to your MCP server.";

pub fn tool_title(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_TOOL_ID) {
        return "Greet".to_string();
    }
    title_case_id(id)
}

pub fn tool_description(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_TOOL_ID) {
        return "Greets a user with a short welcome.".to_string();
    }
    format!("Tool stub for {id}.")
}

pub fn resource_title(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_RESOURCE_ID) {
        return "Readme".to_string();
    }
    title_case_id(id)
}

pub fn resource_description(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_RESOURCE_ID) {
        return "A readme stub resource.".to_string();
    }
    format!("Resource stub for {id}.")
}

pub fn resource_text(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_RESOURCE_ID) {
        return DEFAULT_RESOURCE_TEXT.to_string();
    }
    format!("This is the {id} stub.")
}

pub fn prompt_title(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_PROMPT_ID) {
        return "Welcome".to_string();
    }
    title_case_id(id)
}

pub fn prompt_description(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_PROMPT_ID) {
        return "A friendly welcome prompt.".to_string();
    }
    format!("Prompt stub for {id}.")
}

pub fn prompt_template(id: &str) -> String {
    if id.eq_ignore_ascii_case(DEFAULT_PROMPT_ID) {
        return DEFAULT_PROMPT_TEMPLATE.to_string();
    }
    format!("Prompt {id} stub")
}
