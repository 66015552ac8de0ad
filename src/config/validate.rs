//! Normalization and validation of a [`ConfigInput`].
//!
//! [`normalize`] is pure: it never touches its input and returns a fully
//! defaulted [`Config`] together with every violation it found. Sections run
//! unconditionally in a fixed order (server, tools, resources, prompts,
//! transport) so one pass reports all problems at once.

use std::collections::HashSet;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::config::defaults::{self, DEFAULT_HTTP_PORT, DEFAULT_SCHEMA, DEFAULT_SERVER_DESCRIPTION, DEFAULT_TRANSPORT};
use crate::config::{
    Config, ConfigInput, PromptConfig, PromptInput, PromptRole, ResourceConfig, ResourceInput,
    ResourceLocator, Section, ServerConfig, ServerInput, ToolConfig, ToolInput, TransportConfig,
    TransportInput, TransportKind, ValidationError, Violation,
};
use crate::core::utils::{is_valid_module_path, to_module_path};

/// Output of [`normalize`]: the defaulted config plus any violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub config: Config,
    pub violations: Vec<Violation>,
}

impl Normalized {
    pub fn into_result(self) -> Result<Config, ValidationError> {
        if self.violations.is_empty() {
            Ok(self.config)
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

impl ConfigInput {
    /// Validates the input and returns the normalized config, or the aggregate
    /// of every violation found.
    pub fn validate(&self) -> Result<Config, ValidationError> {
        normalize(self).into_result()
    }
}

/// Applies defaults and collects violations without mutating `input`.
pub fn normalize(input: &ConfigInput) -> Normalized {
    let mut violations = Vec::new();

    let server = normalize_server(&input.server, &mut violations);
    let tools = normalize_tools(&input.tools, &mut violations);
    let resources = normalize_resources(&input.resources, &mut violations);
    let prompts = normalize_prompts(&input.prompts, &mut violations);
    let transport = normalize_transport(&input.transport, &mut violations);

    debug!(violations = violations.len(), "config normalized");

    Normalized {
        config: Config {
            server,
            tools,
            resources,
            prompts,
            transport,
        },
        violations,
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn or_default(value: &str, default: impl FnOnce() -> String) -> String {
    if is_blank(value) {
        default()
    } else {
        value.to_string()
    }
}

fn optional(value: &str) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        Some(value.to_string())
    }
}

fn normalize_server(input: &ServerInput, violations: &mut Vec<Violation>) -> ServerConfig {
    if is_blank(&input.name) {
        violations.push(Violation::new(Section::Server, "server name"));
    }

    let module = or_default(&input.module, || to_module_path(&input.name));
    if !is_valid_module_path(&module) {
        violations.push(Violation::new(
            Section::Server,
            format!("server.module is not a valid module path: {module:?}"),
        ));
    }

    ServerConfig {
        name: input.name.clone(),
        version: optional(&input.version),
        title: or_default(&input.title, || input.name.clone()),
        description: or_default(&input.description, || DEFAULT_SERVER_DESCRIPTION.to_string()),
        website_url: optional(&input.website_url),
        module,
    }
}

fn normalize_tools(inputs: &[ToolInput], violations: &mut Vec<Violation>) -> Vec<ToolConfig> {
    let mut seen = HashSet::new();
    let mut tools = Vec::with_capacity(inputs.len());

    for (i, tool) in inputs.iter().enumerate() {
        if is_blank(&tool.id) {
            violations.push(Violation::new(
                Section::Tools,
                format!("tool[{i}].id is required"),
            ));
            tools.push(ToolConfig {
                id: tool.id.clone(),
                title: tool.title.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
                output_schema: tool.output_schema.clone(),
            });
            continue;
        }

        if !seen.insert(tool.id.as_str()) {
            violations.push(Violation::new(
                Section::Tools,
                format!("tool id {:?} is duplicated", tool.id),
            ));
        }

        let input_schema = or_default(&tool.input_schema, || DEFAULT_SCHEMA.to_string());
        if let Err(message) = check_schema_object(&input_schema) {
            violations.push(Violation::new(
                Section::Tools,
                format!("tool {} input_schema {message}", tool.id),
            ));
        }

        let output_schema = or_default(&tool.output_schema, || DEFAULT_SCHEMA.to_string());
        if let Err(message) = check_schema_object(&output_schema) {
            violations.push(Violation::new(
                Section::Tools,
                format!("tool {} output_schema {message}", tool.id),
            ));
        }

        tools.push(ToolConfig {
            id: tool.id.clone(),
            title: or_default(&tool.title, || defaults::tool_title(&tool.id)),
            description: or_default(&tool.description, || defaults::tool_description(&tool.id)),
            input_schema,
            output_schema,
        });
    }
    tools
}

fn normalize_resources(
    inputs: &[ResourceInput],
    violations: &mut Vec<Violation>,
) -> Vec<ResourceConfig> {
    let mut seen = HashSet::new();
    let mut resources = Vec::with_capacity(inputs.len());

    for (i, resource) in inputs.iter().enumerate() {
        let locator = locator_of(resource);

        if is_blank(&resource.id) {
            violations.push(Violation::new(
                Section::Resources,
                format!("resource[{i}].id is required"),
            ));
            resources.push(ResourceConfig {
                id: resource.id.clone(),
                title: resource.title.clone(),
                description: resource.description.clone(),
                locator,
                mime_type: optional(&resource.mime_type),
                text: resource.text.clone(),
            });
            continue;
        }

        let id = &resource.id;
        if !seen.insert(id.as_str()) {
            violations.push(Violation::new(
                Section::Resources,
                format!("resource id {id:?} is duplicated"),
            ));
        }

        match &locator {
            ResourceLocator::Invalid { uri, .. } if uri.is_empty() => {
                violations.push(Violation::new(
                    Section::Resources,
                    format!("resource {id:?} must set either uri or uri_template"),
                ));
            }
            ResourceLocator::Invalid { .. } => {
                violations.push(Violation::new(
                    Section::Resources,
                    format!("resource {id:?} must set only one of uri or uri_template"),
                ));
            }
            _ => {}
        }

        let uri = resource.uri.trim();
        if !uri.is_empty() {
            if let Err(e) = url::Url::parse(uri) {
                violations.push(Violation::new(
                    Section::Resources,
                    format!("resource {id:?} uri invalid: {e}"),
                ));
            }
        }

        resources.push(ResourceConfig {
            id: id.clone(),
            title: or_default(&resource.title, || defaults::resource_title(id)),
            description: or_default(&resource.description, || defaults::resource_description(id)),
            locator,
            mime_type: optional(&resource.mime_type),
            text: or_default(&resource.text, || defaults::resource_text(id)),
        });
    }
    resources
}

fn locator_of(resource: &ResourceInput) -> ResourceLocator {
    let uri = resource.uri.trim();
    let template = resource.uri_template.trim();

    match (uri.is_empty(), template.is_empty()) {
        (false, true) => ResourceLocator::Uri(uri.to_string()),
        (true, false) => ResourceLocator::Template(template.to_string()),
        _ => ResourceLocator::Invalid {
            uri: uri.to_string(),
            uri_template: template.to_string(),
        },
    }
}

fn normalize_prompts(inputs: &[PromptInput], violations: &mut Vec<Violation>) -> Vec<PromptConfig> {
    let mut seen = HashSet::new();
    let mut prompts = Vec::with_capacity(inputs.len());

    for (i, prompt) in inputs.iter().enumerate() {
        if is_blank(&prompt.id) {
            violations.push(Violation::new(
                Section::Prompts,
                format!("prompt[{i}].id is required"),
            ));
            prompts.push(PromptConfig {
                id: prompt.id.clone(),
                title: prompt.title.clone(),
                description: prompt.description.clone(),
                role: prompt.role.trim().parse().unwrap_or_default(),
                template: prompt.template.clone(),
                arguments: prompt.arguments.clone(),
            });
            continue;
        }

        let id = &prompt.id;
        if !seen.insert(id.as_str()) {
            violations.push(Violation::new(
                Section::Prompts,
                format!("prompt id {id:?} is duplicated"),
            ));
        }

        let role = if is_blank(&prompt.role) {
            PromptRole::User
        } else {
            prompt.role.trim().parse().unwrap_or_else(|_| {
                warn!(prompt = %id, role = %prompt.role, "unknown prompt role, using user");
                PromptRole::User
            })
        };

        for (j, arg) in prompt.arguments.iter().enumerate() {
            if is_blank(&arg.name) {
                violations.push(Violation::new(
                    Section::Prompts,
                    format!("prompt {id:?} argument[{j}].name is required"),
                ));
            }
        }

        prompts.push(PromptConfig {
            id: id.clone(),
            title: or_default(&prompt.title, || defaults::prompt_title(id)),
            description: or_default(&prompt.description, || defaults::prompt_description(id)),
            role,
            template: or_default(&prompt.template, || defaults::prompt_template(id)),
            arguments: prompt.arguments.clone(),
        });
    }
    prompts
}

fn normalize_transport(input: &TransportInput, violations: &mut Vec<Violation>) -> TransportConfig {
    let kind = if is_blank(&input.kind) {
        DEFAULT_TRANSPORT
    } else {
        input.kind.trim().parse::<TransportKind>().unwrap_or_else(|_| {
            violations.push(Violation::new(Section::Transport, "transport type"));
            DEFAULT_TRANSPORT
        })
    };

    let http_port = if input.http_port == 0 {
        DEFAULT_HTTP_PORT
    } else {
        input.http_port
    };

    if !(1..=65535).contains(&http_port) {
        violations.push(Violation::new(Section::Transport, "port"));
    }

    TransportConfig { kind, http_port }
}

fn check_schema_object(raw: &str) -> Result<(), String> {
    let object: Map<String, JsonValue> =
        serde_json::from_str(raw).map_err(|e| format!("must be valid JSON: {e}"))?;

    match object.get("type") {
        Some(kind) if kind.as_str() != Some("object") => Err("must have type=object".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PromptArgument;
    use tracing_test::traced_test;

    fn named(name: &str) -> ConfigInput {
        ConfigInput {
            server: ServerInput {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn tool(id: &str) -> ToolInput {
        ToolInput {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn resource(id: &str, uri: &str, uri_template: &str) -> ResourceInput {
        ResourceInput {
            id: id.to_string(),
            uri: uri.to_string(),
            uri_template: uri_template.to_string(),
            ..Default::default()
        }
    }

    fn prompt(id: &str) -> PromptInput {
        PromptInput {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn messages(input: &ConfigInput) -> Vec<String> {
        normalize(input)
            .violations
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_valid_config_fills_defaults() {
        let mut input = named("test-server");
        input.server.version = "1.0.0".to_string();
        input.transport.kind = "stdio".to_string();
        input.transport.http_port = 8080;

        let config = input.validate().unwrap();
        assert_eq!(config.server.title, "test-server");
        assert_eq!(config.server.description, DEFAULT_SERVER_DESCRIPTION);
        assert_eq!(config.server.module, "example.com/test-server");
        assert_eq!(config.server.version.as_deref(), Some("1.0.0"));
        assert_eq!(config.transport.kind, TransportKind::Stdio);
    }

    #[test]
    fn test_blank_fields_are_defaulted() {
        let config = named("weather").validate().unwrap();
        assert_eq!(config.transport.kind, DEFAULT_TRANSPORT);
        assert_eq!(config.transport.http_port, DEFAULT_HTTP_PORT);
        assert!(config.server.version.is_none());
        assert!(config.server.website_url.is_none());
    }

    #[test]
    fn test_accumulates_multiple_errors() {
        let mut input = named("");
        input.transport.kind = "invalid".to_string();
        input.transport.http_port = 99999;

        let err = input.validate().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("server name"));
        assert!(text.contains("transport type"));
        assert!(text.contains("port"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = named("weather");
        let before = input.clone();
        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut input = named("weather");
        input.tools = vec![tool("greet")];
        input.resources = vec![resource("readme", "file:///readme", "")];
        input.prompts = vec![prompt("welcome")];

        let first = input.validate().unwrap();
        let second = first.to_input().validate().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_module_path_is_reported_even_when_user_supplied() {
        let mut input = named("weather");
        input.server.module = "no-slash".to_string();

        let got = messages(&input);
        assert_eq!(got, vec![r#"server.module is not a valid module path: "no-slash""#]);
    }

    #[test]
    fn test_tool_validation() {
        let cases: Vec<(&str, Vec<ToolInput>, usize)> = vec![
            ("valid tool", vec![tool("my-tool")], 0),
            ("missing tool id", vec![tool("")], 1),
            ("blank tool id", vec![tool("   ")], 1),
            ("duplicate ids", vec![tool("a"), tool("a"), tool("a")], 2),
            (
                "bad schema json",
                vec![ToolInput {
                    input_schema: "{not json".to_string(),
                    ..tool("x")
                }],
                1,
            ),
            (
                "schema with wrong type",
                vec![ToolInput {
                    output_schema: r#"{"type":"array"}"#.to_string(),
                    ..tool("x")
                }],
                1,
            ),
            (
                "schema array is not an object",
                vec![ToolInput {
                    input_schema: "[]".to_string(),
                    ..tool("x")
                }],
                1,
            ),
            (
                "schema without type key",
                vec![ToolInput {
                    input_schema: r#"{"properties":{}}"#.to_string(),
                    ..tool("x")
                }],
                0,
            ),
        ];

        for (name, tools, expected) in cases {
            let mut input = named("srv");
            input.tools = tools;
            assert_eq!(messages(&input).len(), expected, "case {name}");
        }
    }

    #[test]
    fn test_blank_tool_id_only_stops_that_entry() {
        let mut input = named("srv");
        input.tools = vec![tool(""), tool("second")];

        let normalized = normalize(&input);
        assert_eq!(normalized.violations.len(), 1);
        assert_eq!(normalized.violations[0].message, "tool[0].id is required");
        assert_eq!(normalized.config.tools[0].title, "");
        assert_eq!(normalized.config.tools[1].title, "Second");
        assert_eq!(normalized.config.tools[1].input_schema, DEFAULT_SCHEMA);
    }

    #[test]
    fn test_duplicate_ids_report_once_per_repeat() {
        let mut input = named("srv");
        input.tools = vec![tool("a"), tool("b"), tool("a")];
        input.resources = vec![
            resource("r", "file:///r", ""),
            resource("r", "file:///r", ""),
        ];
        input.prompts = vec![prompt("p"), prompt("p"), prompt("p")];

        let got = messages(&input);
        assert_eq!(got.iter().filter(|m| m.contains("tool id \"a\" is duplicated")).count(), 1);
        assert_eq!(got.iter().filter(|m| m.contains("resource id \"r\" is duplicated")).count(), 1);
        assert_eq!(got.iter().filter(|m| m.contains("prompt id \"p\" is duplicated")).count(), 2);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn test_same_id_across_collections_is_allowed() {
        let mut input = named("srv");
        input.tools = vec![tool("shared")];
        input.resources = vec![resource("shared", "file:///shared", "")];
        input.prompts = vec![prompt("shared")];

        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_resource_locator_rule() {
        let cases = [
            ("both set", resource("r", "file:///r", "file:///{id}"), 1),
            ("neither set", resource("r", "", ""), 1),
            ("uri only", resource("r", "file:///r", ""), 0),
            ("template only", resource("r", "", "docs://{id}"), 0),
            ("uri without scheme", resource("r", "readme", ""), 1),
        ];

        for (name, res, expected) in cases {
            let mut input = named("srv");
            input.resources = vec![res];
            assert_eq!(messages(&input).len(), expected, "case {name}");
        }
    }

    #[test]
    fn test_resource_defaults() {
        let mut input = named("srv");
        input.resources = vec![resource("readme", "file:///readme", "")];

        let config = input.validate().unwrap();
        let res = &config.resources[0];
        assert_eq!(res.title, "Readme");
        assert_eq!(res.text, defaults::DEFAULT_RESOURCE_TEXT);
        assert_eq!(res.locator, ResourceLocator::Uri("file:///readme".to_string()));
        assert!(res.mime_type.is_none());
    }

    #[test]
    fn test_prompt_validation() {
        let mut input = named("srv");
        input.prompts = vec![PromptInput {
            arguments: vec![
                PromptArgument {
                    name: "city".to_string(),
                    required: true,
                    ..Default::default()
                },
                PromptArgument::default(),
                PromptArgument::default(),
            ],
            ..prompt("welcome")
        }];

        let normalized = normalize(&input);
        assert_eq!(
            normalized
                .violations
                .iter()
                .map(|v| v.message.as_str())
                .collect::<Vec<_>>(),
            vec![
                r#"prompt "welcome" argument[1].name is required"#,
                r#"prompt "welcome" argument[2].name is required"#,
            ]
        );
        let p = &normalized.config.prompts[0];
        assert_eq!(p.role, PromptRole::User);
        assert_eq!(p.template, defaults::DEFAULT_PROMPT_TEMPLATE);
        assert_eq!(p.title, "Welcome");
    }

    #[test]
    #[traced_test]
    fn test_prompt_role() {
        let mut input = named("srv");
        input.prompts = vec![
            PromptInput {
                role: "assistant".to_string(),
                ..prompt("a")
            },
            PromptInput {
                role: "system".to_string(),
                ..prompt("b")
            },
        ];

        let config = input.validate().unwrap();
        assert_eq!(config.prompts[0].role, PromptRole::Assistant);
        assert_eq!(config.prompts[1].role, PromptRole::User);
        assert!(logs_contain("unknown prompt role"));
    }

    #[test]
    fn test_transport_validation() {
        let mut input = named("srv");
        input.transport.kind = "tcp".to_string();
        input.transport.http_port = 70000;

        let normalized = normalize(&input);
        assert_eq!(normalized.config.transport.kind, DEFAULT_TRANSPORT);
        assert_eq!(normalized.config.transport.http_port, 70000);
        assert_eq!(
            normalized.violations,
            vec![
                Violation::new(Section::Transport, "transport type"),
                Violation::new(Section::Transport, "port"),
            ]
        );

        input.transport.kind = "http".to_string();
        input.transport.http_port = -1;
        assert_eq!(messages(&input), vec!["port"]);

        input.transport.http_port = 65535;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_sections_are_reported_in_order() {
        let mut input = named("");
        input.tools = vec![tool("")];
        input.resources = vec![resource("", "", "")];
        input.prompts = vec![prompt("")];
        input.transport.kind = "bogus".to_string();

        let sections: Vec<Section> = normalize(&input)
            .violations
            .iter()
            .map(|v| v.section)
            .collect();
        assert_eq!(
            sections,
            vec![
                Section::Server,
                Section::Tools,
                Section::Resources,
                Section::Prompts,
                Section::Transport,
            ]
        );
    }
}
