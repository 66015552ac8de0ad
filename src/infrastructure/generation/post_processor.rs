//! Source formatting applied to generated Rust files

use std::path::Path;

use crate::generation::{GenerationError, SourceFormatter};

/// Parses generated Rust with `syn` and pretty-prints it with `prettyplease`.
///
/// Output that does not parse means a template produced invalid code, so it
/// is reported instead of being written.
pub struct RustSourceFormatter;

impl RustSourceFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustSourceFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFormatter for RustSourceFormatter {
    fn format(&self, path: &Path, source: &[u8]) -> Result<Vec<u8>, GenerationError> {
        let format_err = |message: String| GenerationError::Format {
            path: path.to_path_buf(),
            message,
        };

        let text = std::str::from_utf8(source).map_err(|e| format_err(e.to_string()))?;
        let file = syn::parse_file(text).map_err(|e| format_err(e.to_string()))?;

        Ok(prettyplease::unparse(&file).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_valid_source() {
        let formatter = RustSourceFormatter::new();
        let formatted = formatter
            .format(
                Path::new("lib.rs"),
                b"/// Doc.\npub fn answer( )->u32{42}",
            )
            .unwrap();

        assert_eq!(
            String::from_utf8(formatted).unwrap(),
            "/// Doc.\npub fn answer() -> u32 {\n    42\n}\n"
        );
    }

    #[test]
    fn test_formatting_is_stable() {
        let formatter = RustSourceFormatter::new();
        let once = formatter
            .format(Path::new("lib.rs"), b"mod a;\nuse std::fmt;\nstruct S { x: u8 }")
            .unwrap();
        let twice = formatter.format(Path::new("lib.rs"), &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_source_is_a_format_error() {
        let formatter = RustSourceFormatter::new();
        let err = formatter
            .format(Path::new("internal/mcpapp/lib.rs"), b"fn (")
            .unwrap_err();

        match err {
            GenerationError::Format { path, message } => {
                assert_eq!(path, Path::new("internal/mcpapp/lib.rs"));
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
