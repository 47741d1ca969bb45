//! Request/reply transport port.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Result type for transport adapter operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Continuation invoked with a request's reply.
pub type ReplyHandler = Box<dyn FnOnce(Reply) + Send>;

/// Opaque request descriptor: a command name and ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    command: String,
    args: Vec<String>,
}

impl Request {
    /// Creates a request without arguments.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the command name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns whether this request matches `command` and `args` exactly.
    #[must_use]
    pub fn matches(&self, command: &str, args: &[&str]) -> bool {
        self.command == command
            && self.args.len() == args.len()
            && self.args.iter().zip(args).all(|(own, other)| own.as_str() == *other)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.command)?;
        for arg in &self.args {
            write!(formatter, " {arg}")?;
        }
        Ok(())
    }
}

/// The single reply delivered for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Whether the daemon reports success.
    pub success: bool,
    /// Reply payload; on failure usually an error description.
    pub payload: Value,
}

impl Reply {
    /// Creates a successful reply.
    #[must_use]
    pub const fn success(payload: Value) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    /// Creates a failed reply carrying an error message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: Value::String(message.into()),
        }
    }

    /// Returns a readable reason for a failed reply.
    ///
    /// Uses the payload's `error` field when present, the payload itself when
    /// it is a string, and its JSON rendering otherwise.
    #[must_use]
    pub fn failure_reason(&self) -> String {
        match &self.payload {
            Value::String(message) => message.clone(),
            Value::Object(fields) => fields
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| self.payload.to_string(), str::to_owned),
            other => other.to_string(),
        }
    }
}

/// Sends requests and delivers exactly one reply per request.
///
/// Implementations must invoke `on_reply` exactly once, asynchronously, and
/// never from within `send` itself. No ordering is guaranteed between
/// requests.
pub trait Transport: Send + Sync {
    /// Issues `request`; `on_reply` receives its reply later.
    fn send(&self, request: Request, on_reply: ReplyHandler);
}

/// Errors returned by transport adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No outstanding request matches.
    #[error("no pending request matches `{0}`")]
    NoPendingRequest(String),

    /// The adapter was created outside a tokio runtime.
    #[error("transport requires a running tokio runtime")]
    NoRuntime,
}
