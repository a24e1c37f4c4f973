//! Transform functions and the registry they are looked up in.
//!
//! A transform receives the current value of a token plus the literal
//! arguments written in the template and produces the next value. Every
//! transform is awaited by the pipeline, so synchronous and asynchronous
//! implementations are interchangeable:
//!
//! ```
//! use plynt::registry::{async_fn, sync_fn, TransformRegistry};
//!
//! let mut registry = TransformRegistry::new();
//! registry.register("wrap", sync_fn(|value, args| {
//!     let left = args.first().map(String::as_str).unwrap_or("");
//!     let right = args.get(1).map(String::as_str).unwrap_or("");
//!     Ok(format!("{left}{value}{right}"))
//! }));
//! registry.register("shout", async_fn(|value, _args| async move {
//!     Ok(format!("{value}!"))
//! }));
//! assert!(registry.contains("wrap"));
//! ```

use async_trait::async_trait;
use indexmap::IndexMap;
use std::future::Future;
use std::sync::Arc;

/// A named transformation applied in a token's function chain.
#[async_trait]
pub trait Transform: Send + Sync {
    /// Transforms `input` using the call's literal `args`.
    async fn apply(&self, input: &str, args: &[String]) -> anyhow::Result<String>;
}

/// Adapter for synchronous closures, see [`sync_fn`].
pub struct SyncFn<F>(F);

/// Adapter for closures returning a future, see [`async_fn`].
pub struct AsyncFn<F>(F);

/// Wraps a synchronous closure as a [`Transform`].
pub fn sync_fn<F>(f: F) -> SyncFn<F>
where
    F: Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync,
{
    SyncFn(f)
}

/// Wraps a closure returning a future as a [`Transform`].
///
/// The closure receives owned copies of the value and arguments so the
/// returned future does not borrow from the pipeline.
pub fn async_fn<F, Fut>(f: F) -> AsyncFn<F>
where
    F: Fn(String, Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    AsyncFn(f)
}

#[async_trait]
impl<F> Transform for SyncFn<F>
where
    F: Fn(&str, &[String]) -> anyhow::Result<String> + Send + Sync,
{
    async fn apply(&self, input: &str, args: &[String]) -> anyhow::Result<String> {
        (self.0)(input, args)
    }
}

#[async_trait]
impl<F, Fut> Transform for AsyncFn<F>
where
    F: Fn(String, Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
{
    async fn apply(&self, input: &str, args: &[String]) -> anyhow::Result<String> {
        (self.0)(input.to_string(), args.to_vec()).await
    }
}

/// Maps function names to transforms.
///
/// Each registry is independent; there is no process-wide state. A new
/// registry already holds the built-ins `trim`, `upper`, `lower` and
/// `capitalize`.
#[derive(Clone)]
pub struct TransformRegistry {
    functions: IndexMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Creates a registry seeded with the built-in transforms.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("trim", sync_fn(|value, _| Ok(value.trim().to_string())));
        registry.register("upper", sync_fn(|value, _| Ok(value.to_uppercase())));
        registry.register("lower", sync_fn(|value, _| Ok(value.to_lowercase())));
        registry.register("capitalize", sync_fn(|value, _| Ok(capitalize(value))));
        registry
    }

    /// Creates a registry without any built-ins.
    pub fn empty() -> Self {
        Self {
            functions: IndexMap::new(),
        }
    }

    /// Registers `transform` under `name`, replacing any previous entry.
    pub fn register<T>(&mut self, name: impl Into<String>, transform: T)
    where
        T: Transform + 'static,
    {
        self.register_shared(name, Arc::new(transform));
    }

    /// Registers an already shared transform under `name`.
    pub fn register_shared(&mut self, name: impl Into<String>, transform: Arc<dyn Transform>) {
        self.functions.insert(name.into(), transform);
    }

    /// Looks up a transform by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        TransformRegistry::new()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// First character uppercased, the rest lowercased.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}
