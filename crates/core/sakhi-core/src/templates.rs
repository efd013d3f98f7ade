//! Template engine for prompt generation

use crate::{Result, SakhiError};
use handlebars::Handlebars;
use serde::Serialize;

/// Template engine wrapper.
///
/// Prompts are plain text, so HTML escaping is switched off: chat history must
/// reach the model byte-for-byte.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("join", Box::new(join_helper));

        Self { handlebars }
    }

    /// Render an ad-hoc template with data
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| SakhiError::template(e.to_string()))
    }

    /// Register a template
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| SakhiError::template(e.to_string()))?;
        Ok(())
    }

    /// Whether a template is registered under `name`
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    /// Render a registered template
    pub fn render_named<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| SakhiError::template(e.to_string()))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `{{join list ", "}}`: string items of `list` joined by the separator
fn join_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let list = h
        .param(0)
        .ok_or(handlebars::RenderErrorReason::ParamNotFoundForIndex("join", 0))?;
    let separator = h
        .param(1)
        .and_then(|p| p.value().as_str())
        .unwrap_or(", ");

    let items: Vec<&str> = list
        .value()
        .as_array()
        .map(|values| values.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    out.write(&items.join(separator))?;
    Ok(())
}
