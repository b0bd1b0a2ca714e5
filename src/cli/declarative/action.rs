//! Invocation context and action composition
//!
//! An [`Action`] is what the program calls when a registered command is
//! dispatched. Plain commands get a composed action: the invocation is folded
//! through each [`Middleware`] in declared order and the result is handed to
//! the [`Handler`]. Aliases get an action that asks the program to re-parse a
//! synthesized command line.

use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Future returned by a handler; handlers report their own failures
pub type HandlerFuture = BoxFuture<'static, ()>;

/// Transform applied to an invocation before it reaches the handler
pub type Middleware = Arc<dyn Fn(Invocation) -> Invocation + Send + Sync>;

/// Terminal business logic of a command
pub type Handler = Arc<dyn Fn(Invocation) -> HandlerFuture + Send + Sync>;

/// Callback bound to a registered command
pub type Action = Arc<dyn Fn(Invocation) -> ActionOutcome + Send + Sync>;

/// What the program should do after calling an action
pub enum ActionOutcome {
    /// Run the handler future to completion
    Run(HandlerFuture),
    /// Parse this argument vector (without the binary name) from the top
    Redispatch(Vec<String>),
}

impl std::fmt::Debug for ActionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Run(_) => f.write_str("Run(..)"),
            Self::Redispatch(argv) => f.debug_tuple("Redispatch").field(argv).finish(),
        }
    }
}

/// Arguments of a dispatched command.
///
/// `args` starts as the positional values in signature order (a variadic
/// positional is a JSON array, a missing optional one is `null`). Middleware
/// is free to change its length and element types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// Registered name of the dispatched command
    pub command: String,
    /// Positional values
    pub args: Vec<Value>,
    /// Option values keyed by long flag name
    pub options: IndexMap<String, Value>,
}

impl Invocation {
    /// Create an empty invocation for `command`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Append a positional value
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Set an option value
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Insert a value ahead of the existing positionals
    pub fn prepend_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.insert(0, value.into());
        self
    }

    /// Positional value at `index`
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Positional string at `index`; `None` when missing, null or not a string
    pub fn arg_str(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(Value::as_str)
    }

    /// Option value rendered as a string
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }

    /// Whether a presence flag was set
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(Value::Bool(true)))
    }

    /// Positionals flattened back into command-line words
    pub fn positional_words(&self) -> Vec<String> {
        fn push_words(value: &Value, out: &mut Vec<String>) {
            match value {
                Value::Null => {}
                Value::String(s) => out.push(s.clone()),
                Value::Array(items) => items.iter().for_each(|v| push_words(v, out)),
                other => out.push(other.to_string()),
            }
        }

        let mut words = Vec::new();
        for value in &self.args {
            push_words(value, &mut words);
        }
        words
    }
}

/// Wrap an async function as a [`Handler`]
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(Invocation) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |invocation: Invocation| Box::pin(f(invocation)) as HandlerFuture)
}

/// Wrap a transform as a [`Middleware`]
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Invocation) -> Invocation + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Compose an already-resolved middleware chain and handler into one action
pub fn compose(middleware: Vec<Middleware>, handler: Handler) -> Action {
    Arc::new(move |invocation: Invocation| {
        let invocation = middleware.iter().fold(invocation, |current, stage| stage(current));
        ActionOutcome::Run(handler(invocation))
    })
}

/// Action for an alias: template words followed by the captured positionals
pub fn alias_action(template: &str) -> Action {
    let words: Vec<String> = template.split_whitespace().map(str::to_string).collect();
    Arc::new(move |invocation: Invocation| {
        let mut argv = words.clone();
        argv.extend(invocation.positional_words());
        ActionOutcome::Redispatch(argv)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_compose_applies_middleware_in_order() {
        let seen: Arc<Mutex<Vec<Invocation>>> = Arc::new(Mutex::new(Vec::new()));

        let m1 = middleware_fn(|inv| inv.prepend_arg("bot-1"));
        let m2 = middleware_fn(|mut inv| {
            let count = inv.args.len();
            inv.args.push(json!(count));
            inv
        });
        let recorder = seen.clone();
        let handler = handler_fn(move |inv| {
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(inv);
            }
        });

        let action = compose(vec![m1, m2], handler);
        match action(Invocation::new("deployment-drop").with_arg("prod")) {
            ActionOutcome::Run(fut) => fut.await,
            other => panic!("Expected Run, got {:?}", other),
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].args, vec![json!("bot-1"), json!("prod"), json!(2)]);
    }

    #[test]
    fn test_compose_does_not_run_handler_until_polled() {
        let ran = Arc::new(Mutex::new(false));
        let flag = ran.clone();
        let handler = handler_fn(move |_| {
            let flag = flag.clone();
            async move {
                *flag.lock().unwrap() = true;
            }
        });

        let action = compose(vec![], handler);
        let outcome = action(Invocation::new("x"));
        assert!(matches!(outcome, ActionOutcome::Run(_)));
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn test_alias_action_appends_positionals() {
        let action = alias_action("deploy  create");
        let invocation = Invocation::new("d").with_arg(json!(["x", "y"]));
        match action(invocation) {
            ActionOutcome::Redispatch(argv) => assert_eq!(argv, vec!["deploy", "create", "x", "y"]),
            other => panic!("Expected Redispatch, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_words_skips_missing_optionals() {
        let invocation = Invocation::new("c")
            .with_arg("prod")
            .with_arg(Value::Null)
            .with_arg(json!(["a", 2]));
        assert_eq!(invocation.positional_words(), vec!["prod", "a", "2"]);
    }

    #[test]
    fn test_accessors() {
        let invocation = Invocation::new("c")
            .with_arg("prod")
            .with_option("data", "{}")
            .with_option("force", true);
        assert_eq!(invocation.arg_str(0), Some("prod"));
        assert_eq!(invocation.arg_str(1), None);
        assert_eq!(invocation.option_str("data"), Some("{}"));
        assert!(invocation.flag("force"));
        assert!(!invocation.flag("data"));
    }
}
