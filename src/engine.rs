//! The rendering pipeline.
//!
//! An [`Engine`] owns a transform registry and rendering options. Rendering
//! walks the tokens of a [`ParsedTemplate`] in source order and, for each one:
//!
//! 1. reuses the value of an identical earlier token (same raw text), or
//! 2. resolves the token's path against the metadata and picks the value:
//!    resolved value, then the token's fallback, then a strict-mode
//!    `MissingKey` failure, then the configured default,
//! 3. feeds the value through the function chain, awaiting each call,
//! 4. replaces the first remaining occurrence of the token's raw text.
//!
//! A failing token never aborts the render. It is reported through the error
//! callback and degrades to the default value. The one exception is strict
//! mode without a callback, where `MissingKey` and `UnknownFunction` are
//! returned to the caller.

use crate::config::EngineOptions;
use crate::error::{Error, ErrorContext, Result};
use crate::registry::{Transform, TransformRegistry};
use crate::resolver::{resolve, stringify};
use crate::template::{replace_first, ParsedTemplate};
use crate::token::Token;
use log::{debug, trace, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback receiving every per-token error the pipeline recovers from.
pub type ErrorCallback = Arc<dyn Fn(&Error, &ErrorContext) + Send + Sync>;

/// Template engine: transform registry plus rendering options.
///
/// # Example
/// ```
/// use plynt::engine::Engine;
/// use serde_json::json;
///
/// let engine = Engine::new();
/// let metadata = json!({"user": {"name": "john doe"}});
///
/// let rendered = pollster::block_on(
///     engine.render("Hello, <<@user:name->capitalize@>>!", &metadata),
/// ).unwrap();
/// assert_eq!(rendered, "Hello, John doe!");
/// ```
#[derive(Clone)]
pub struct Engine {
    registry: TransformRegistry,
    options: EngineOptions,
    on_error: Option<ErrorCallback>,
}

impl Engine {
    /// Creates an engine with default options and the built-in transforms.
    pub fn new() -> Self {
        Self {
            registry: TransformRegistry::new(),
            options: EngineOptions::default(),
            on_error: None,
        }
    }

    /// Creates an engine with the given options.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the options carry an empty delimiter
    pub fn with_options(options: EngineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    /// Sets the callback invoked for recovered per-token errors.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Error, &ErrorContext) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Builder form of [`Engine::register`].
    pub fn with_function<T>(mut self, name: impl Into<String>, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        self.register(name, transform);
        self
    }

    /// Adds or replaces a transform.
    pub fn register<T>(&mut self, name: impl Into<String>, transform: T)
    where
        T: Transform + 'static,
    {
        self.registry.register(name, transform);
    }

    /// Looks up a transform by name.
    pub fn function(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.registry.get(name)
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Scans a template with this engine's delimiters.
    pub fn parse(&self, template: &str) -> ParsedTemplate {
        ParsedTemplate::parse(template, &self.options.wrapper)
    }

    /// Parses `template` once and returns a reusable renderer.
    pub fn build(&self, template: &str) -> Renderer<'_> {
        Renderer {
            engine: self,
            parsed: self.parse(template),
        }
    }

    /// Parses and renders `template` in one go.
    pub async fn render(&self, template: &str, metadata: &Value) -> Result<String> {
        self.render_parsed(&self.parse(template), metadata).await
    }

    /// Parses `template` once and returns a handle offering both rendering
    /// and reverse transformation.
    pub fn compile(&self, template: &str) -> Compiled<'_> {
        Compiled {
            renderer: self.build(template),
        }
    }

    /// Rewrites `template`, replacing each token with `replacer(token)`.
    pub fn to<F>(&self, template: &str, replacer: F) -> String
    where
        F: FnMut(&Token) -> String,
    {
        self.parse(template).transform_each(replacer)
    }

    /// Builds the metadata skeleton of `template`.
    pub fn metadata(&self, template: &str) -> Value {
        self.parse(template).metadata()
    }

    /// Renders an already parsed template against `metadata`.
    ///
    /// The memo of computed token values lives only for this call.
    pub async fn render_parsed(
        &self,
        parsed: &ParsedTemplate,
        metadata: &Value,
    ) -> Result<String> {
        debug!("Rendering template with {} token(s)", parsed.tokens().len());

        let mut result = parsed.template().to_string();
        let mut memo: HashMap<&str, String> = HashMap::new();

        for token in parsed.tokens() {
            let value = match memo.get(token.raw.as_str()) {
                Some(value) => {
                    trace!("Reusing value of {}", token.raw);
                    value.clone()
                }
                None => {
                    let value = self.render_token(token, metadata).await?;
                    memo.insert(token.raw.as_str(), value.clone());
                    value
                }
            };

            replace_first(&mut result, &token.raw, &value);
        }

        Ok(result)
    }

    async fn render_token(&self, token: &Token, metadata: &Value) -> Result<String> {
        match self.evaluate(token, metadata).await {
            Ok(value) => Ok(value),
            Err(err) => self.recover(err),
        }
    }

    /// Selects the token's value and runs it through the function chain.
    async fn evaluate(&self, token: &Token, metadata: &Value) -> Result<String> {
        let mut value = match resolve(&token.path, metadata) {
            Some(resolved) => stringify(resolved),
            None => match &token.fallback {
                Some(fallback) => fallback.clone(),
                None if self.options.strict => {
                    return Err(Error::MissingKey {
                        key: token.key.clone(),
                        path: token.path.clone(),
                    })
                }
                None => self.options.fallback_value.clone(),
            },
        };

        for call in &token.functions {
            let Some(transform) = self.registry.get(&call.name) else {
                let err = Error::UnknownFunction {
                    name: call.name.clone(),
                    key: token.key.clone(),
                    path: token.path.clone(),
                };
                if self.options.strict {
                    return Err(err);
                }
                self.report(&err);
                continue;
            };

            value = transform
                .apply(&value, &call.args)
                .await
                .map_err(|source| Error::TransformError {
                    name: call.name.clone(),
                    key: token.key.clone(),
                    path: token.path.clone(),
                    source,
                })?;
        }

        Ok(value)
    }

    /// Escalates strict-mode failures when nothing absorbs them, otherwise
    /// reports the error and falls back to the default value.
    fn recover(&self, err: Error) -> Result<String> {
        let escalate = self.options.strict
            && self.on_error.is_none()
            && matches!(err, Error::MissingKey { .. } | Error::UnknownFunction { .. });
        if escalate {
            return Err(err);
        }

        self.report(&err);
        Ok(self.options.fallback_value.clone())
    }

    fn report(&self, err: &Error) {
        warn!("{err}");
        if let (Some(callback), Some(context)) = (&self.on_error, err.context()) {
            callback(err, &context);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// A template parsed once and bound to an engine, see [`Engine::build`].
#[derive(Debug, Clone)]
pub struct Renderer<'e> {
    engine: &'e Engine,
    parsed: ParsedTemplate,
}

impl Renderer<'_> {
    /// Renders the template against `metadata`.
    pub async fn render(&self, metadata: &Value) -> Result<String> {
        self.engine.render_parsed(&self.parsed, metadata).await
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        &self.parsed
    }
}

/// Renderer plus reverse transformation, see [`Engine::compile`].
#[derive(Debug, Clone)]
pub struct Compiled<'e> {
    renderer: Renderer<'e>,
}

impl Compiled<'_> {
    pub async fn render(&self, metadata: &Value) -> Result<String> {
        self.renderer.render(metadata).await
    }

    /// See [`ParsedTemplate::transform_each`].
    pub fn transform_each<F>(&self, replacer: F) -> String
    where
        F: FnMut(&Token) -> String,
    {
        self.renderer.parsed.transform_each(replacer)
    }

    /// See [`ParsedTemplate::metadata`].
    pub fn metadata(&self) -> Value {
        self.renderer.parsed.metadata()
    }

    pub fn parsed(&self) -> &ParsedTemplate {
        self.renderer.parsed()
    }
}
