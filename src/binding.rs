//! Argument binding: coercing a raw argument value to a handler parameter type

use async_graphql::{InputType, Name, Pos, Value};
use indexmap::IndexMap;
use thiserror::Error;

/// Raw value looked up for one argument
///
/// `Omitted` means the key was absent. A key that is present with an
/// explicit `null` is `Present(&Value::Null)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgumentValue<'a> {
    Omitted,
    Present(&'a Value),
}

impl<'a> ArgumentValue<'a> {
    /// Look up `name` in a map of raw values
    pub fn lookup(values: &'a IndexMap<Name, Value>, name: &str) -> Self {
        match values.get(name) {
            Some(value) => ArgumentValue::Present(value),
            None => ArgumentValue::Omitted,
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, ArgumentValue::Omitted)
    }

    pub fn raw(&self) -> Option<&'a Value> {
        match self {
            ArgumentValue::Present(value) => Some(value),
            ArgumentValue::Omitted => None,
        }
    }
}

/// Structured failure to bind an argument
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to bind argument '{name}' as {target_type}: {message}")]
pub struct BindError {
    name: String,
    target_type: String,
    message: String,
}

impl BindError {
    pub fn new(name: impl Into<String>, target_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_type: target_type.into(),
            message: message.into(),
        }
    }

    /// Argument name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// GraphQL type the value was bound against, e.g. `String!`
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Coerces and validates raw argument values
pub trait ArgumentBinder: Send + Sync {
    /// Bind `value` to the parameter type `T`
    ///
    /// Implementations decide what omission means for `T`, e.g. `None` for
    /// optional types and an error for required ones.
    fn bind<T: InputType>(&self, name: &str, value: ArgumentValue<'_>) -> Result<T, BindError>;
}

/// Binder backed by async-graphql input coercion
///
/// Omitted values reach [`InputType::parse`] as `None` and explicit nulls as
/// `Some(Value::Null)`, so `Option<T>` parameters accept both while
/// required parameters reject both.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphQlArgumentBinder;

impl GraphQlArgumentBinder {
    pub fn new() -> Self {
        Self
    }
}

impl ArgumentBinder for GraphQlArgumentBinder {
    fn bind<T: InputType>(&self, name: &str, value: ArgumentValue<'_>) -> Result<T, BindError> {
        T::parse(value.raw().cloned()).map_err(|e| {
            BindError::new(
                name,
                T::qualified_type_name(),
                e.into_server_error(Pos::default()).message,
            )
        })
    }
}
