//! Default scaffold config and the text printed around a run

use std::fmt::Write as _;
use std::path::Path;

use crate::config::defaults::{
    DEFAULT_PROMPT_ID, DEFAULT_PROMPT_TEMPLATE, DEFAULT_RESOURCE_ID, DEFAULT_RESOURCE_TEXT,
    DEFAULT_SERVER_VERSION, DEFAULT_TOOL_ID,
};
use crate::config::{
    Config, ConfigInput, PromptInput, ResourceInput, ServerInput, ToolInput, TransportInput,
    TransportKind,
};
use crate::core::utils::{server_file_token, to_package_name};

/// Which stub collections a default scaffold includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub tools: bool,
    pub resources: bool,
    pub prompts: bool,
}

impl Features {
    pub fn all() -> Self {
        Self {
            tools: true,
            resources: true,
            prompts: true,
        }
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::all()
    }
}

/// Builds the one-of-each scaffold used when no config file is given.
///
/// The module is left blank so validation derives it from the name.
pub fn default_config(
    name: &str,
    transport: TransportKind,
    port: i64,
    features: Features,
) -> ConfigInput {
    let mut input = ConfigInput {
        server: ServerInput {
            name: name.to_string(),
            version: DEFAULT_SERVER_VERSION.to_string(),
            ..Default::default()
        },
        transport: TransportInput {
            kind: transport.as_str().to_string(),
            http_port: port,
        },
        ..Default::default()
    };

    if features.tools {
        input.tools.push(ToolInput {
            id: DEFAULT_TOOL_ID.to_string(),
            ..Default::default()
        });
    }

    if features.prompts {
        input.prompts.push(PromptInput {
            id: DEFAULT_PROMPT_ID.to_string(),
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            ..Default::default()
        });
    }

    if features.resources {
        input.resources.push(ResourceInput {
            id: DEFAULT_RESOURCE_ID.to_string(),
            uri: format!("file:///{DEFAULT_RESOURCE_ID}"),
            text: DEFAULT_RESOURCE_TEXT.to_string(),
            ..Default::default()
        });
    }

    input
}

/// Plan printed before generation.
pub fn summary(config: &Config, out_dir: &Path) -> String {
    let features: Vec<&str> = [
        config.tools.first().map(|t| t.id.as_str()),
        config.resources.first().map(|r| r.id.as_str()),
        config.prompts.first().map(|p| p.id.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let feature_list = if features.is_empty() {
        "none".to_string()
    } else {
        features.join(", ")
    };

    let mut out = String::from("\nSummary\n");
    let _ = writeln!(
        out,
        "  Server:    {} ({})",
        config.server.name,
        config.server.version.as_deref().unwrap_or("unversioned")
    );
    let _ = writeln!(out, "  Module:    {}", config.server.module);
    let _ = writeln!(out, "  Transport: {}", transport_label(config));
    let _ = writeln!(out, "  Features:  {feature_list}");
    if let Some(resource) = config.resources.first() {
        if resource.uri_template().is_empty() {
            let _ = writeln!(out, "  Resource uri: {}", resource.uri());
        } else {
            let _ = writeln!(out, "  Resource template: {}", resource.uri_template());
        }
    }
    let _ = writeln!(out, "  Output:    {}", out_dir.display());
    out
}

fn transport_label(config: &Config) -> String {
    match config.transport.kind {
        TransportKind::Stdio => "stdio".to_string(),
        TransportKind::Http => format!("http (port {})", config.transport.http_port),
    }
}

/// How to open the generated server in the MCP inspector by hand.
pub fn inspector_hint(config: &Config, out_dir: &Path) -> String {
    let bin_name = to_package_name(&server_file_token(&config.server.name));

    match config.transport.kind {
        TransportKind::Http => format!(
            "\nOpen in Inspector:\n  cd {}\n  cargo run --bin {bin_name} &\n  npx @modelcontextprotocol/inspector\n  (In the UI, set transport to HTTP and use http://localhost:{}/mcp)\n",
            out_dir.display(),
            config.transport.http_port,
        ),
        TransportKind::Stdio => format!(
            "\nOpen in Inspector:\n  cd {}\n  npx @modelcontextprotocol/inspector\n  (In the UI, choose stdio and run: cargo run --quiet --bin {bin_name})\n",
            out_dir.display(),
        ),
    }
}
