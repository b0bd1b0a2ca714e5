//! Handler resolution - maps configuration names to callable methods
//!
//! The compiler only sees the [`HandlerResolver`] trait. [`MethodRegistry`]
//! is the in-process implementation the application fills at startup.

use super::action::{Handler, Middleware};
use super::error::{DeclarativeError, DeclarativeResult};
use async_trait::async_trait;
use indexmap::IndexMap;

/// Resolves handler and middleware names to callables.
///
/// Resolution may be async (lazy construction of services), and it runs
/// once per command registration, never per invocation.
#[async_trait]
pub trait HandlerResolver: Send + Sync {
    /// Resolve a terminal handler by name
    async fn resolve_handler(&self, name: &str) -> DeclarativeResult<Handler>;

    /// Resolve a middleware transform by name
    async fn resolve_middleware(&self, name: &str) -> DeclarativeResult<Middleware>;
}

/// A registered callable
#[derive(Clone)]
pub enum Method {
    /// Terminal handler
    Handler(Handler),
    /// Middleware transform
    Middleware(Middleware),
}

impl Method {
    fn kind(&self) -> &'static str {
        match self {
            Self::Handler(_) => "handler",
            Self::Middleware(_) => "middleware",
        }
    }
}

/// Name-keyed registry of handlers and middleware
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: IndexMap<String, Method>,
}

impl MethodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method; names are unique across handlers and middleware
    pub fn register(&mut self, name: impl Into<String>, method: Method) -> DeclarativeResult<()> {
        let name = name.into();
        if self.methods.contains_key(&name) {
            return Err(DeclarativeError::DuplicateMethod(name));
        }
        self.methods.insert(name, method);
        Ok(())
    }

    /// Register a handler
    pub fn register_handler(&mut self, name: impl Into<String>, handler: Handler) -> DeclarativeResult<()> {
        self.register(name, Method::Handler(handler))
    }

    /// Register a middleware
    pub fn register_middleware(
        &mut self,
        name: impl Into<String>,
        middleware: Middleware,
    ) -> DeclarativeResult<()> {
        self.register(name, Method::Middleware(middleware))
    }

    /// Check if a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names with their kind, in registration order
    pub fn entries(&self) -> Vec<(&str, &'static str)> {
        self.methods
            .iter()
            .map(|(name, method)| (name.as_str(), method.kind()))
            .collect()
    }

    /// Number of registered methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[async_trait]
impl HandlerResolver for MethodRegistry {
    async fn resolve_handler(&self, name: &str) -> DeclarativeResult<Handler> {
        match self.methods.get(name) {
            Some(Method::Handler(handler)) => Ok(handler.clone()),
            _ => Err(DeclarativeError::HandlerNotFound(name.to_string())),
        }
    }

    async fn resolve_middleware(&self, name: &str) -> DeclarativeResult<Middleware> {
        match self.methods.get(name) {
            Some(Method::Middleware(middleware)) => Ok(middleware.clone()),
            _ => Err(DeclarativeError::MiddlewareNotFound(name.to_string())),
        }
    }
}
