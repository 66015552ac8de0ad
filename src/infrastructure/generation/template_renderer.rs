//! Tera-based template renderer over the embedded template folder

use once_cell::sync::OnceCell;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use tracing::debug;

use crate::generation::{GenerationError, TemplateData, TemplateId, TemplateRenderer};

/// Container for all templates embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Tera-based template renderer. Templates are parsed on first use and
/// reused for every later render.
pub struct TeraTemplateRenderer {
    tera: OnceCell<Tera>,
}

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self {
            tera: OnceCell::new(),
        }
    }

    fn tera(&self, template: TemplateId) -> Result<&Tera, GenerationError> {
        self.tera.get_or_try_init(|| {
            load_templates().map_err(|message| GenerationError::Render { template, message })
        })
    }
}

impl Default for TeraTemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for TeraTemplateRenderer {
    fn render(&self, template: TemplateId, data: &TemplateData) -> Result<Vec<u8>, GenerationError> {
        let render_err = |message: String| GenerationError::Render { template, message };

        let tera = self.tera(template)?;
        let context = Context::from_serialize(data)
            .map_err(|e| render_err(format!("Failed to build context: {e}")))?;

        let rendered = tera
            .render(template.template_path(), &context)
            .map_err(|e| render_err(format!("Failed to render template: {}", error_chain(&e))))?;

        debug!(template = %template, bytes = rendered.len(), "rendered template");
        Ok(rendered.into_bytes())
    }
}

fn load_templates() -> Result<Tera, String> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("quote", quote_filter);
    tera.register_filter("toml_quote", toml_quote_filter);

    let mut sources = Vec::new();
    for path in EmbeddedTemplates::iter() {
        let file = EmbeddedTemplates::get(&path)
            .ok_or_else(|| format!("embedded template {path} disappeared"))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| format!("template {path} is not UTF-8: {e}"))?
            .to_string();
        sources.push((path.to_string(), content));
    }

    tera.add_raw_templates(sources)
        .map_err(|e| format!("Failed to add templates: {}", error_chain(&e)))?;

    for id in TemplateId::all() {
        if !tera.get_template_names().any(|name| name == id.template_path()) {
            return Err(format!("missing template {}", id.template_path()));
        }
    }
    Ok(tera)
}

fn filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `{{ value | quote }}` renders a Rust string literal.
fn quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(format!("{:?}", filter_text(value))))
}

/// `{{ value | toml_quote }}` renders a TOML string.
fn toml_quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(toml::Value::String(filter_text(value)).to_string()))
}

/// Tera nests the useful message in the error source chain.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
