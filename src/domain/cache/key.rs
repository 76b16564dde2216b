//! Cache key derivation from key templates and call arguments

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::DomainError;

/// Positional placeholder in a key pattern, e.g. `{0}`
static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Positional arguments of a cacheable call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(Vec<Value>);

impl CallArgs {
    /// Creates an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from any serializable value.
    ///
    /// Tuples and sequences become one argument per element, `()` becomes no
    /// arguments and any other value becomes a single argument.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, DomainError> {
        let value = serde_json::to_value(value)
            .map_err(|e| DomainError::serialization(format!("Failed to serialize arguments: {}", e)))?;

        Ok(match value {
            Value::Array(values) => Self(values),
            Value::Null => Self::default(),
            other => Self(vec![other]),
        })
    }

    /// Appends an argument
    pub fn with<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, DomainError> {
        let value = serde_json::to_value(value)
            .map_err(|e| DomainError::serialization(format!("Failed to serialize argument: {}", e)))?;
        self.0.push(value);
        Ok(self)
    }

    /// Reads the argument at `index` as `V`
    pub fn get<V: DeserializeOwned>(&self, index: usize) -> Result<V, DomainError> {
        let value = self.0.get(index).ok_or_else(|| {
            DomainError::validation(format!(
                "Missing argument {} (call has {} arguments)",
                index,
                self.0.len()
            ))
        })?;

        V::deserialize(value)
            .map_err(|e| DomainError::validation(format!("Invalid argument {}: {}", index, e)))
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Key function: must be pure and must not block
pub type KeyFn = Arc<dyn Fn(&CallArgs) -> Result<String, DomainError> + Send + Sync>;

/// How the cache key of a registration is derived from its arguments
#[derive(Clone)]
pub enum KeyTemplate {
    /// Static pattern with `{n}` positional placeholders
    Pattern(String),
    /// Pure function of the positional arguments
    Function(KeyFn),
}

impl KeyTemplate {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<String, DomainError> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }
}

impl fmt::Debug for KeyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Function(_) => f.debug_tuple("Function").field(&"<fn>").finish(),
        }
    }
}

impl From<&str> for KeyTemplate {
    fn from(pattern: &str) -> Self {
        Self::Pattern(pattern.to_string())
    }
}

impl From<String> for KeyTemplate {
    fn from(pattern: String) -> Self {
        Self::Pattern(pattern)
    }
}

/// Turns a key template and call arguments into a concrete cache key
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    namespace: Option<String>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes every built key with `namespace:`
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Builds the key for `args`. Equal arguments always give the same key.
    pub fn build_key(&self, template: &KeyTemplate, args: &CallArgs) -> Result<String, DomainError> {
        let key = match template {
            KeyTemplate::Function(f) => f(args)?,
            KeyTemplate::Pattern(pattern) => Self::substitute(pattern, args)?,
        };

        Ok(match &self.namespace {
            Some(namespace) => format!("{}:{}", namespace, key),
            None => key,
        })
    }

    fn substitute(pattern: &str, args: &CallArgs) -> Result<String, DomainError> {
        let mut missing = None;

        let key = PLACEHOLDER_PATTERN.replace_all(pattern, |caps: &Captures| {
            let value = caps[1].parse::<usize>().ok().and_then(|i| args.values().get(i));

            match value {
                Some(value) => stringify(value),
                None => {
                    missing.get_or_insert_with(|| caps[0].to_string());
                    String::new()
                }
            }
        });

        if let Some(placeholder) = missing {
            return Err(DomainError::key_template(format!(
                "Pattern '{}' references {} but the call has {} arguments",
                pattern,
                placeholder,
                args.len()
            )));
        }

        Ok(key.into_owned())
    }
}

/// Strings are inserted raw, everything else as compact JSON
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
