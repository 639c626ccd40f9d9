//! Per-field execution context seen by handler argument resolvers

use async_graphql::{Context, Name, Value};
use indexmap::IndexMap;

use crate::federation::Representation;

/// Execution context for the field currently being resolved
///
/// Argument resolvers only read from it. Decorators such as
/// [`EntityEnvironment`](crate::federation::EntityEnvironment) forward every
/// method to the environment they wrap and add capabilities on top.
pub trait DataFetchingEnvironment {
    /// Name of the field in the schema
    fn field_name(&self) -> &str;

    /// Alias used in the operation, if any
    fn alias(&self) -> Option<&str>;

    /// Response path of the field, e.g. `product.reviews.0`
    fn path(&self) -> &str;

    /// Query arguments of the field, variables already resolved
    fn arguments(&self) -> &IndexMap<Name, Value>;

    fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments().get(name)
    }

    fn contains_argument(&self, name: &str) -> bool {
        self.arguments().contains_key(name)
    }

    /// Federation representation attached to this context
    ///
    /// Only environments created through [`wrap`](crate::federation::wrap)
    /// return `Some`.
    fn representation(&self) -> Option<&Representation> {
        None
    }
}

impl<E: DataFetchingEnvironment + ?Sized> DataFetchingEnvironment for &E {
    fn field_name(&self) -> &str {
        (**self).field_name()
    }

    fn alias(&self) -> Option<&str> {
        (**self).alias()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn arguments(&self) -> &IndexMap<Name, Value> {
        (**self).arguments()
    }

    fn argument(&self, name: &str) -> Option<&Value> {
        (**self).argument(name)
    }

    fn contains_argument(&self, name: &str) -> bool {
        (**self).contains_argument(name)
    }

    fn representation(&self) -> Option<&Representation> {
        (**self).representation()
    }
}

impl<E: DataFetchingEnvironment + ?Sized> DataFetchingEnvironment for Box<E> {
    fn field_name(&self) -> &str {
        (**self).field_name()
    }

    fn alias(&self) -> Option<&str> {
        (**self).alias()
    }

    fn path(&self) -> &str {
        (**self).path()
    }

    fn arguments(&self) -> &IndexMap<Name, Value> {
        (**self).arguments()
    }

    fn argument(&self, name: &str) -> Option<&Value> {
        (**self).argument(name)
    }

    fn contains_argument(&self, name: &str) -> bool {
        (**self).contains_argument(name)
    }

    fn representation(&self) -> Option<&Representation> {
        (**self).representation()
    }
}

/// Owned snapshot of a field's execution context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEnvironment {
    field_name: String,
    alias: Option<String>,
    path: String,
    arguments: IndexMap<Name, Value>,
}

impl FieldEnvironment {
    /// Create environment for a field with no arguments
    pub fn new(field_name: impl Into<String>) -> Self {
        let field_name = field_name.into();
        Self {
            path: field_name.clone(),
            field_name,
            alias: None,
            arguments: IndexMap::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_argument(mut self, name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.arguments.insert(Name::new(name), value.into());
        self
    }

    /// Capture the environment of the field `ctx` is resolving
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use async_graphql::Context;
    /// use pleme_graphql_federation::environment::FieldEnvironment;
    ///
    /// fn resolver(ctx: &Context<'_>) -> async_graphql::Result<FieldEnvironment> {
    ///     FieldEnvironment::from_context(ctx)
    /// }
    /// ```
    pub fn from_context(ctx: &Context<'_>) -> async_graphql::Result<Self> {
        let field = ctx.field();
        let arguments = field.arguments()?.into_iter().collect();
        let path = ctx
            .path_node
            .as_ref()
            .map(|node| node.to_string())
            .unwrap_or_else(|| field.name().to_string());

        Ok(Self {
            field_name: field.name().to_string(),
            alias: field.alias().map(str::to_string),
            path,
            arguments,
        })
    }
}

impl DataFetchingEnvironment for FieldEnvironment {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn arguments(&self) -> &IndexMap<Name, Value> {
        &self.arguments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_environment_builder() {
        let env = FieldEnvironment::new("product")
            .with_alias("p")
            .with_path("product")
            .with_argument("id", "42");

        assert_eq!(env.field_name(), "product");
        assert_eq!(env.alias(), Some("p"));
        assert_eq!(env.argument("id"), Some(&Value::from("42")));
        assert!(!env.contains_argument("region"));
        assert!(env.representation().is_none());
    }

    #[test]
    fn test_reference_forwards_to_environment() {
        let env = FieldEnvironment::new("product").with_argument("upc", Value::Null);
        let borrowed = &env;

        assert_eq!(borrowed.field_name(), "product");
        assert_eq!(borrowed.path(), "product");
        assert!(borrowed.contains_argument("upc"));
        assert_eq!(borrowed.argument("upc"), Some(&Value::Null));
    }
}
