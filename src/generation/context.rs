//! Rendering context - the read-only projection of a validated config that
//! templates consume.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::config::{Config, PromptArgument, PromptRole, TransportKind};
use crate::core::utils::{to_export_identifier, to_file_token, to_package_name};

/// MIME type used for resources that do not declare one.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Package version used when the server version is not a semver triple.
pub const FALLBACK_PACKAGE_VERSION: &str = "0.1.0";

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.+-]+)?$").expect("static regex is valid")
});

/// Everything a template can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    pub module: String,
    /// File token naming `cmd/<server_name>` and the binary.
    pub server_name: String,
    /// Cargo package and binary name derived from `server_name`.
    pub package_name: String,
    pub server_display_name: String,
    pub server_title: String,
    pub server_version: Option<String>,
    pub package_version: String,
    pub website_url: Option<String>,
    pub instructions: String,
    pub transport: TransportData,
    pub tools: Vec<ToolData>,
    pub resources: Vec<ResourceData>,
    pub prompts: Vec<PromptData>,
    pub has_required_args: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransportData {
    pub kind: TransportKind,
    pub http_port: i64,
    pub is_http: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolData {
    pub id: String,
    pub ident: String,
    pub file_token: String,
    pub title: String,
    pub description: String,
    pub input_schema: String,
    pub output_schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceData {
    pub id: String,
    pub ident: String,
    pub file_token: String,
    pub title: String,
    pub description: String,
    pub uri: String,
    pub uri_template: String,
    pub mime_type: String,
    pub text: String,
    /// Concrete URI a generated test can read.
    pub test_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptData {
    pub id: String,
    pub ident: String,
    pub file_token: String,
    pub title: String,
    pub description: String,
    pub template: String,
    pub role: PromptRole,
    pub arguments: Vec<PromptArgument>,
    /// Names of required arguments, sorted.
    pub required_args: Vec<String>,
}

/// Builds the rendering context. Never fails; `config` is assumed validated.
pub fn build_context(config: &Config, server_name: &str) -> TemplateData {
    let tools = config
        .tools
        .iter()
        .map(|tool| ToolData {
            id: tool.id.clone(),
            ident: to_export_identifier(&tool.id),
            file_token: to_file_token(&tool.id),
            title: tool.title.clone(),
            description: tool.description.clone(),
            input_schema: normalize_json(&tool.input_schema),
            output_schema: normalize_json(&tool.output_schema),
        })
        .collect();

    let resources = config
        .resources
        .iter()
        .map(|res| {
            let test_uri = if res.uri_template().is_empty() {
                res.uri().to_string()
            } else {
                res.uri_template().replace("{id}", &res.id)
            };

            ResourceData {
                id: res.id.clone(),
                ident: to_export_identifier(&res.id),
                file_token: to_file_token(&res.id),
                title: res.title.clone(),
                description: res.description.clone(),
                uri: res.uri().to_string(),
                uri_template: res.uri_template().to_string(),
                mime_type: res
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                text: res.text.clone(),
                test_uri,
            }
        })
        .collect();

    let prompts: Vec<PromptData> = config
        .prompts
        .iter()
        .map(|prompt| {
            let mut required_args: Vec<String> = prompt
                .arguments
                .iter()
                .filter(|arg| arg.required)
                .map(|arg| arg.name.clone())
                .collect();
            required_args.sort();

            PromptData {
                id: prompt.id.clone(),
                ident: to_export_identifier(&prompt.id),
                file_token: to_file_token(&prompt.id),
                title: prompt.title.clone(),
                description: prompt.description.clone(),
                template: prompt.template.clone(),
                role: prompt.role,
                arguments: prompt.arguments.clone(),
                required_args,
            }
        })
        .collect();

    let has_required_args = prompts.iter().any(|p| !p.required_args.is_empty());

    TemplateData {
        module: config.server.module.clone(),
        server_name: server_name.to_string(),
        package_name: to_package_name(server_name),
        server_display_name: config.server.name.clone(),
        server_title: config.server.title.clone(),
        server_version: config.server.version.clone(),
        package_version: package_version(config.server.version.as_deref()),
        website_url: config.server.website_url.clone(),
        instructions: config.server.description.clone(),
        transport: TransportData {
            kind: config.transport.kind,
            http_port: config.transport.http_port,
            is_http: matches!(config.transport.kind, TransportKind::Http),
        },
        tools,
        resources,
        prompts,
        has_required_args,
    }
}

/// Re-serializes JSON text in compact form with sorted keys.
///
/// Blank input yields `{}`; text that does not parse is returned unchanged.
pub fn normalize_json(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "{}".to_string();
    }

    match serde_json::from_str::<JsonValue>(raw) {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Cargo needs a bare semver; a leading `v` is dropped.
fn package_version(version: Option<&str>) -> String {
    let candidate = version.map(|v| v.trim().trim_start_matches('v')).unwrap_or_default();
    if SEMVER.is_match(candidate) {
        candidate.to_string()
    } else {
        FALLBACK_PACKAGE_VERSION.to_string()
    }
}

/// A generated identifier shared by more than one id in the same collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierCollision {
    pub collection: &'static str,
    pub ident: String,
    pub ids: Vec<String>,
}

/// Finds distinct ids that map to the same generated identifier.
pub fn identifier_collisions(data: &TemplateData) -> Vec<IdentifierCollision> {
    let mut collisions = Vec::new();
    collect_collisions(
        "tool",
        data.tools.iter().map(|t| (&t.ident, &t.id)),
        &mut collisions,
    );
    collect_collisions(
        "resource",
        data.resources.iter().map(|r| (&r.ident, &r.id)),
        &mut collisions,
    );
    collect_collisions(
        "prompt",
        data.prompts.iter().map(|p| (&p.ident, &p.id)),
        &mut collisions,
    );
    collisions
}

fn collect_collisions<'a>(
    collection: &'static str,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
    out: &mut Vec<IdentifierCollision>,
) {
    let mut by_ident: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (ident, id) in entries {
        by_ident.entry(ident).or_default().push(id.clone());
    }

    out.extend(
        by_ident
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(ident, ids)| IdentifierCollision {
                collection,
                ident: ident.to_string(),
                ids,
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigInput, PromptInput, ResourceInput, ServerInput, ToolInput};

    fn validated(input: ConfigInput) -> Config {
        input.validate().unwrap()
    }

    fn base() -> ConfigInput {
        ConfigInput {
            server: ServerInput {
                name: "Weather Svc".to_string(),
                version: "v1.2.3".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_json() {
        assert_eq!(normalize_json(""), "{}");
        assert_eq!(normalize_json("   "), "{}");
        assert_eq!(
            normalize_json(r#"{ "type" : "object", "a": 1 }"#),
            r#"{"a":1,"type":"object"}"#
        );
        assert_eq!(normalize_json("{not json"), "{not json");
    }

    #[test]
    fn test_copies_server_fields() {
        let data = build_context(&validated(base()), "weather_svc");
        assert_eq!(data.server_name, "weather_svc");
        assert_eq!(data.package_name, "weather_svc");
        assert_eq!(data.server_display_name, "Weather Svc");
        assert_eq!(data.server_title, "Weather Svc");
        assert_eq!(data.module, "example.com/weather-svc");
        assert_eq!(data.server_version.as_deref(), Some("v1.2.3"));
        assert_eq!(data.package_version, "1.2.3");
        assert_eq!(data.transport.kind, TransportKind::Stdio);
        assert!(!data.transport.is_http);
    }

    #[test]
    fn test_package_version_fallback() {
        assert_eq!(package_version(None), FALLBACK_PACKAGE_VERSION);
        assert_eq!(package_version(Some("latest")), FALLBACK_PACKAGE_VERSION);
        assert_eq!(package_version(Some("2.0.0-beta.1")), "2.0.0-beta.1");
    }

    #[test]
    fn test_entities_keep_order_and_get_identifiers() {
        let mut input = base();
        input.tools = vec![
            ToolInput {
                id: "zeta".to_string(),
                ..Default::default()
            },
            ToolInput {
                id: "get-forecast".to_string(),
                ..Default::default()
            },
        ];

        let data = build_context(&validated(input), "weather_svc");
        let idents: Vec<&str> = data.tools.iter().map(|t| t.ident.as_str()).collect();
        assert_eq!(idents, vec!["Zeta", "GetForecast"]);
        assert_eq!(data.tools[0].input_schema, r#"{"type":"object"}"#);
    }

    #[test]
    fn test_resource_test_uri() {
        let mut input = base();
        input.resources = vec![
            ResourceInput {
                id: "readme".to_string(),
                uri: "file:///readme".to_string(),
                ..Default::default()
            },
            ResourceInput {
                id: "doc".to_string(),
                uri_template: "docs://{id}/{id}?v={version}".to_string(),
                mime_type: "text/markdown".to_string(),
                ..Default::default()
            },
        ];

        let data = build_context(&validated(input), "weather_svc");
        assert_eq!(data.resources[0].test_uri, "file:///readme");
        assert_eq!(data.resources[0].mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(data.resources[1].test_uri, "docs://doc/doc?v={version}");
        assert_eq!(data.resources[1].mime_type, "text/markdown");
        assert_eq!(data.resources[1].uri, "");
    }

    #[test]
    fn test_required_args_are_sorted() {
        let mut input = base();
        input.prompts = vec![PromptInput {
            id: "plan".to_string(),
            arguments: vec![
                PromptArgument {
                    name: "zone".to_string(),
                    required: true,
                    ..Default::default()
                },
                PromptArgument {
                    name: "optional".to_string(),
                    ..Default::default()
                },
                PromptArgument {
                    name: "city".to_string(),
                    required: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }];

        let data = build_context(&validated(input), "weather_svc");
        assert_eq!(data.prompts[0].required_args, vec!["city", "zone"]);
        assert_eq!(data.prompts[0].arguments[0].name, "zone");
        assert!(data.has_required_args);
    }

    #[test]
    fn test_identifier_collisions() {
        let mut input = base();
        input.tools = vec![
            ToolInput {
                id: "my-tool".to_string(),
                ..Default::default()
            },
            ToolInput {
                id: "My_Tool".to_string(),
                ..Default::default()
            },
            ToolInput {
                id: "other".to_string(),
                ..Default::default()
            },
        ];

        let data = build_context(&validated(input), "weather_svc");
        let collisions = identifier_collisions(&data);
        assert_eq!(
            collisions,
            vec![IdentifierCollision {
                collection: "tool",
                ident: "MyTool".to_string(),
                ids: vec!["my-tool".to_string(), "My_Tool".to_string()],
            }]
        );
    }
}
