//! MiniJinja conversion and rendering.
//!
//! Placeholders are rewritten into Jinja expressions so templates can be
//! handed to tools that speak Jinja. Function calls become filters and a
//! fallback becomes a leading `default` filter:
//!
//! ```text
//! <<@user:name->trim->truncate(10)@>>[(Friend)]
//! {{ user.name | default("Friend") | trim | truncate(10) }}
//! ```
use crate::error::Result;
use crate::template::ParsedTemplate;
use crate::token::Token;
use minijinja::Environment;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance with default environment.
    pub fn new() -> Self {
        let env = Environment::new();
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not compile or render
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }
}

/// Rewrites every placeholder of `parsed` as a Jinja expression.
pub fn to_jinja(parsed: &ParsedTemplate) -> String {
    parsed.transform_each(jinja_expression)
}

fn jinja_expression(token: &Token) -> String {
    let mut expr = token.path.clone();

    if let Some(fallback) = &token.fallback {
        expr.push_str(&format!(" | default({})", string_literal(fallback)));
    }

    for call in &token.functions {
        expr.push_str(" | ");
        expr.push_str(&call.name);
        if !call.args.is_empty() {
            let args: Vec<String> = call
                .args
                .iter()
                .map(String::as_str)
                .map(jinja_argument)
                .collect();
            expr.push_str(&format!("({})", args.join(", ")));
        }
    }

    format!("{{{{ {expr} }}}}")
}

/// Numbers stay numbers, everything else becomes a string literal.
fn jinja_argument(arg: &str) -> String {
    let numeric = arg.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if numeric && arg.parse::<f64>().is_ok() {
        arg.to_string()
    } else {
        string_literal(arg)
    }
}

/// JSON string literals are valid Jinja string literals.
fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
