//! String transformation utilities for code generation
//!
//! Every function here is total: empty, symbol-only or non-ASCII input
//! falls back to a fixed token instead of failing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier used when the input has no letter or digit segments.
pub const FALLBACK_IDENTIFIER: &str = "Item";

/// File token used when the input has no letter or digit segments.
pub const FALLBACK_FILE_TOKEN: &str = "item";

/// Command-directory token used when the server name is unusable.
pub const FALLBACK_SERVER_TOKEN: &str = "mcp";

/// Prefix that turns a token Cargo refuses into a usable package name.
pub const PACKAGE_NAME_PREFIX: &str = "mcp_";

/// Names Cargo refuses for a package or binary, plus the generated library's
/// own crate name.
const RESERVED_PACKAGE_NAMES: &[&str] = &[
    "abstract", "alloc", "as", "async", "await", "become", "box", "break", "const", "continue",
    "core", "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen",
    "if", "impl", "in", "let", "loop", "macro", "match", "mcpapp", "mod", "move", "mut",
    "override", "priv", "proc_macro", "pub", "ref", "return", "self", "static", "std", "struct",
    "super", "test", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Slug used when a server name reduces to nothing.
pub const FALLBACK_MODULE_SLUG: &str = "mcp-server";

/// Host-like namespace prefixed to every derived module path.
pub const MODULE_NAMESPACE: &str = "example.com";

static NON_MODULE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]+").expect("static regex is valid"));

/// Splits `input` on every run of characters that are neither letters nor digits.
///
/// # Examples
/// ```
/// use mcpgen::core::utils::split_identifier;
///
/// assert_eq!(split_identifier("a_b-c"), vec!["a", "b", "c"]);
/// assert!(split_identifier("!!!").is_empty());
/// ```
pub fn split_identifier(input: &str) -> Vec<String> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Converts arbitrary text into an exported PascalCase identifier.
///
/// Each segment is title-cased and the segments are concatenated. A result
/// starting with a digit gets an `N` prefix so it stays a valid identifier.
///
/// # Examples
/// ```
/// use mcpgen::core::utils::to_export_identifier;
///
/// assert_eq!(to_export_identifier("foo-server"), "FooServer");
/// assert_eq!(to_export_identifier("2fa"), "N2fa");
/// assert_eq!(to_export_identifier(""), "Item");
/// ```
pub fn to_export_identifier(input: &str) -> String {
    let parts = split_identifier(input);
    if parts.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }

    let ident: String = parts.iter().map(|part| capitalize(part)).collect();
    match ident.chars().next() {
        Some(first) if first.is_numeric() => format!("N{ident}"),
        _ => ident,
    }
}

/// Converts arbitrary text into a lowercase, underscore-joined file token.
///
/// # Examples
/// ```
/// use mcpgen::core::utils::to_file_token;
///
/// assert_eq!(to_file_token("Foo Bar-Baz"), "foo_bar_baz");
/// assert_eq!(to_file_token("***"), "item");
/// ```
pub fn to_file_token(input: &str) -> String {
    file_token_or(input, FALLBACK_FILE_TOKEN)
}

/// Token naming the generated command directory (`cmd/<token>`).
///
/// Same shape as [`to_file_token`] but falls back to `mcp`.
pub fn server_file_token(name: &str) -> String {
    file_token_or(name, FALLBACK_SERVER_TOKEN)
}

/// Cargo package and binary name for a server token.
///
/// Only ASCII letters, digits and `_` are kept. A name that starts with a
/// digit or is reserved gets the `mcp_` prefix.
///
/// # Examples
/// ```
/// use mcpgen::core::utils::to_package_name;
///
/// assert_eq!(to_package_name("weather"), "weather");
/// assert_eq!(to_package_name("3d_printer"), "mcp_3d_printer");
/// assert_eq!(to_package_name("test"), "mcp_test");
/// ```
pub fn to_package_name(token: &str) -> String {
    let ascii: String = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let name = ascii.trim_matches('_').to_ascii_lowercase();

    if name.is_empty() {
        return FALLBACK_SERVER_TOKEN.to_string();
    }
    let starts_with_digit = name.starts_with(|c: char| c.is_ascii_digit());
    if starts_with_digit || RESERVED_PACKAGE_NAMES.contains(&name.as_str()) {
        format!("{PACKAGE_NAME_PREFIX}{name}")
    } else {
        name
    }
}

fn file_token_or(input: &str, fallback: &str) -> String {
    let parts = split_identifier(&input.to_lowercase());
    if parts.is_empty() {
        return fallback.to_string();
    }
    parts.join("_")
}

/// Derives a module path (`example.com/<slug>`) from a server name.
///
/// # Examples
/// ```
/// use mcpgen::core::utils::to_module_path;
///
/// assert_eq!(to_module_path(" My Server "), "example.com/my-server");
/// assert_eq!(to_module_path("my_server@123!"), "example.com/my-server-123");
/// assert_eq!(to_module_path("!!!"), "example.com/mcp-server");
/// ```
pub fn to_module_path(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let replaced = NON_MODULE_CHARS.replace_all(&lowered, "-");
    let slug = replaced.trim_matches('-');

    let slug = if slug.is_empty() {
        FALLBACK_MODULE_SLUG
    } else {
        slug
    };
    format!("{MODULE_NAMESPACE}/{slug}")
}

/// A module path needs at least two `/`-separated segments, none empty and
/// none containing a space.
pub fn is_valid_module_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }

    let parts: Vec<&str> = path.split('/').collect();
    parts.len() >= 2 && !parts.iter().any(|p| p.is_empty() || p.contains(' '))
}

/// Turns an id such as `foo-bar` into a display title (`Foo Bar`).
pub fn title_case_id(id: &str) -> String {
    let words: Vec<String> = id
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    if words.is_empty() {
        return id.to_string();
    }
    words.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_identifier() {
        assert!(split_identifier("").is_empty());
        assert_eq!(split_identifier("a"), vec!["a"]);
        assert_eq!(split_identifier("a_b"), vec!["a", "b"]);
        assert_eq!(split_identifier("a__b--c  d"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_identifier("héllo wörld"), vec!["héllo", "wörld"]);
    }

    #[test]
    fn test_to_export_identifier() {
        assert_eq!(to_export_identifier("greet"), "Greet");
        assert_eq!(to_export_identifier("readme"), "Readme");
        assert_eq!(to_export_identifier("my-tool"), "MyTool");
        assert_eq!(to_export_identifier("My_Tool"), "MyTool");
        assert_eq!(to_export_identifier("LOUD_NAME"), "LoudName");
        assert_eq!(to_export_identifier("123abc"), "N123abc");
        assert_eq!(to_export_identifier("   "), "Item");
        assert_eq!(to_export_identifier("@#$"), "Item");
    }

    #[test]
    fn test_to_file_token() {
        assert_eq!(to_file_token("Greet User"), "greet_user");
        assert_eq!(to_file_token("foo-qux-svc"), "foo_qux_svc");
        assert_eq!(to_file_token(""), "item");
    }

    #[test]
    fn test_server_file_token() {
        assert_eq!(server_file_token(""), "mcp");
        assert_eq!(server_file_token("foo-qux-svc"), "foo_qux_svc");
        assert_eq!(server_file_token("Foo bar Svc"), "foo_bar_svc");
    }

    #[test]
    fn test_to_package_name() {
        assert_eq!(to_package_name("foo_bar_svc"), "foo_bar_svc");
        assert_eq!(to_package_name(&server_file_token("3d printer")), "mcp_3d_printer");
        assert_eq!(to_package_name("std"), "mcp_std");
        assert_eq!(to_package_name("self"), "mcp_self");
        assert_eq!(to_package_name("mcpapp"), "mcp_mcpapp");
        assert_eq!(to_package_name("héllo_wörld"), "hllo_wrld");
        assert_eq!(to_package_name("é"), "mcp");
        assert_eq!(to_package_name("testing"), "testing");
    }

    #[test]
    fn test_to_module_path() {
        let cases = [
            ("my-server", "example.com/my-server"),
            (" My Server ", "example.com/my-server"),
            ("my_server@123!", "example.com/my-server-123"),
            ("", "example.com/mcp-server"),
            ("!!!", "example.com/mcp-server"),
        ];

        for (input, expected) in cases {
            let got = to_module_path(input);
            assert_eq!(got, expected, "input {input:?}");
            assert!(is_valid_module_path(&got));
            assert_eq!(to_module_path(&got[MODULE_NAMESPACE.len() + 1..]), got);
        }
    }

    #[test]
    fn test_is_valid_module_path() {
        assert!(is_valid_module_path("example.com/test"));
        assert!(is_valid_module_path("github.com/org/repo"));
        assert!(!is_valid_module_path(""));
        assert!(!is_valid_module_path("single"));
        assert!(!is_valid_module_path("example.com//x"));
        assert!(!is_valid_module_path("example.com/my server"));
    }

    #[test]
    fn test_title_case_id() {
        assert_eq!(title_case_id("foo-bar"), "Foo Bar");
        assert_eq!(title_case_id("config-file"), "Config File");
        assert_eq!(title_case_id("onboarding"), "Onboarding");
        assert_eq!(title_case_id("---"), "---");
    }
}
