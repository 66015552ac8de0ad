//! Configuration data model.
//!
//! [`ConfigInput`] is what a collector (CLI flags, config file) produces: every
//! field is optional text or a raw integer. [`Config`] is the normalized form
//! returned by validation, with closed enums for transport and prompt role.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw configuration as collected from flags or a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    pub server: ServerInput,
    #[serde(rename = "tool")]
    pub tools: Vec<ToolInput>,
    #[serde(rename = "resource")]
    pub resources: Vec<ResourceInput>,
    #[serde(rename = "prompt")]
    pub prompts: Vec<PromptInput>,
    pub transport: TransportInput,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInput {
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub website_url: String,
    pub module: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub http_port: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolInput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub input_schema: String,
    pub output_schema: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceInput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub uri: String,
    pub uri_template: String,
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptInput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub role: String,
    pub template: String,
    #[serde(rename = "argument")]
    pub arguments: Vec<PromptArgument>,
}

/// A named prompt argument. Shared by the raw and normalized models since
/// validation only checks the name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptArgument {
    pub name: String,
    pub title: String,
    pub description: String,
    pub required: bool,
}

/// Transport the generated server listens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Stdio,
    Http,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportKind::Stdio),
            "http" => Ok(TransportKind::Http),
            other => Err(format!("unknown transport {other:?}")),
        }
    }
}

/// Role of the message a prompt produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    #[default]
    User,
    Assistant,
}

impl PromptRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptRole::User => "user",
            PromptRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for PromptRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(PromptRole::User),
            "assistant" => Ok(PromptRole::Assistant),
            other => Err(format!("unknown prompt role {other:?}")),
        }
    }
}

/// Normalized configuration: every defaultable field is filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub tools: Vec<ToolConfig>,
    pub resources: Vec<ResourceConfig>,
    pub prompts: Vec<PromptConfig>,
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: String,
    pub version: Option<String>,
    pub title: String,
    pub description: String,
    pub website_url: Option<String>,
    pub module: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub kind: TransportKind,
    /// Kept as given when out of range; validation reports it instead of clamping.
    pub http_port: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub input_schema: String,
    pub output_schema: String,
}

/// Where a resource is addressed. Exactly one of the two is set on a valid
/// resource; an invalid input keeps whatever was given so the config can
/// still be inspected after a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    Uri(String),
    Template(String),
    Invalid { uri: String, uri_template: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub locator: ResourceLocator,
    pub mime_type: Option<String>,
    pub text: String,
}

impl ResourceConfig {
    pub fn uri(&self) -> &str {
        match &self.locator {
            ResourceLocator::Uri(uri) => uri,
            ResourceLocator::Invalid { uri, .. } => uri,
            ResourceLocator::Template(_) => "",
        }
    }

    pub fn uri_template(&self) -> &str {
        match &self.locator {
            ResourceLocator::Template(template) => template,
            ResourceLocator::Invalid { uri_template, .. } => uri_template,
            ResourceLocator::Uri(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub role: PromptRole,
    pub template: String,
    pub arguments: Vec<PromptArgument>,
}

impl Config {
    /// Converts the normalized config back into collector form.
    ///
    /// Validating the result yields the same `Config` again.
    pub fn to_input(&self) -> ConfigInput {
        ConfigInput {
            server: ServerInput {
                name: self.server.name.clone(),
                version: self.server.version.clone().unwrap_or_default(),
                title: self.server.title.clone(),
                description: self.server.description.clone(),
                website_url: self.server.website_url.clone().unwrap_or_default(),
                module: self.server.module.clone(),
            },
            tools: self
                .tools
                .iter()
                .map(|t| ToolInput {
                    id: t.id.clone(),
                    title: t.title.clone(),
                    description: t.description.clone(),
                    input_schema: t.input_schema.clone(),
                    output_schema: t.output_schema.clone(),
                })
                .collect(),
            resources: self
                .resources
                .iter()
                .map(|r| ResourceInput {
                    id: r.id.clone(),
                    title: r.title.clone(),
                    description: r.description.clone(),
                    uri: r.uri().to_string(),
                    uri_template: r.uri_template().to_string(),
                    mime_type: r.mime_type.clone().unwrap_or_default(),
                    text: r.text.clone(),
                })
                .collect(),
            prompts: self
                .prompts
                .iter()
                .map(|p| PromptInput {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    description: p.description.clone(),
                    role: p.role.as_str().to_string(),
                    template: p.template.clone(),
                    arguments: p.arguments.clone(),
                })
                .collect(),
            transport: TransportInput {
                kind: self.transport.kind.as_str().to_string(),
                http_port: self.transport.http_port,
            },
        }
    }
}
