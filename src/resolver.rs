//! Handler method argument resolvers
//!
//! A handler parameter marked as a GraphQL argument is bound from a raw
//! value source and coerced by an [`ArgumentBinder`]. On regular fields the
//! source is the field's query arguments. On entity handlers it is the
//! federation representation attached with [`wrap`](crate::federation::wrap).

use async_graphql::InputType;

use crate::binding::{ArgumentBinder, ArgumentValue};
use crate::environment::DataFetchingEnvironment;
use crate::federation::{EntityEnvironment, Representation};
use crate::{GraphQLError, Result};

/// Marks a handler parameter as bound from a GraphQL argument
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument {
    name: Option<String>,
}

impl Argument {
    /// Argument named after the parameter
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument with an explicit name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One parameter of a handler method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    index: usize,
    name: Option<String>,
    argument: Option<Argument>,
}

impl MethodParameter {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            argument: None,
        }
    }

    /// Parameter `name` at `index`, bound from the argument of the same name
    pub fn argument(index: usize, name: impl Into<String>) -> Self {
        Self::new(index).with_name(name).with_argument(Argument::new())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_argument(mut self, argument: Argument) -> Self {
        self.argument = Some(argument);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_argument(&self) -> bool {
        self.argument.is_some()
    }

    /// Name to look up: the explicit argument name, else the parameter name
    pub fn argument_name(&self) -> Result<&str> {
        self.argument
            .as_ref()
            .and_then(Argument::name)
            .filter(|name| !name.is_empty())
            .or(self.name.as_deref())
            .ok_or(GraphQLError::UnnamedParameter(self.index))
    }
}

/// Resolves one handler parameter from the execution context
pub trait MethodArgumentResolver {
    fn supports_parameter(&self, parameter: &MethodParameter) -> bool;

    fn resolve_argument<T, E>(&self, env: &E, parameter: &MethodParameter) -> Result<T>
    where
        T: InputType,
        E: DataFetchingEnvironment + ?Sized;
}

/// Binds parameters from the field's query arguments
#[derive(Debug, Clone, Default)]
pub struct ArgumentMethodArgumentResolver<B> {
    binder: B,
}

impl<B: ArgumentBinder> ArgumentMethodArgumentResolver<B> {
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }
}

impl<B: ArgumentBinder> MethodArgumentResolver for ArgumentMethodArgumentResolver<B> {
    fn supports_parameter(&self, parameter: &MethodParameter) -> bool {
        parameter.is_argument()
    }

    fn resolve_argument<T, E>(&self, env: &E, parameter: &MethodParameter) -> Result<T>
    where
        T: InputType,
        E: DataFetchingEnvironment + ?Sized,
    {
        let name = parameter.argument_name()?;
        let value = ArgumentValue::lookup(env.arguments(), name);
        tracing::debug!(
            field = env.field_name(),
            argument = name,
            omitted = value.is_omitted(),
            "binding query argument"
        );
        Ok(self.binder.bind(name, value)?)
    }
}

/// Binds parameters of entity handlers from the entity representation
///
/// # Example
///
/// ```rust
/// use async_graphql::{value, ID};
/// use pleme_graphql_federation::{
///     wrap, EntityArgumentMethodArgumentResolver, FieldEnvironment, GraphQlArgumentBinder,
///     MethodParameter, Representation,
/// };
///
/// let representation = Representation::from_value(value!({ "id": "42" })).unwrap();
/// let env = wrap(FieldEnvironment::new("_entities"), representation);
/// let resolver = EntityArgumentMethodArgumentResolver::new(GraphQlArgumentBinder::new());
///
/// let id: ID = resolver
///     .resolve_entity_argument(&env, &MethodParameter::argument(0, "id"))
///     .unwrap();
/// assert_eq!(id, ID::from("42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityArgumentMethodArgumentResolver<B> {
    binder: B,
}

impl<B: ArgumentBinder> EntityArgumentMethodArgumentResolver<B> {
    pub fn new(binder: B) -> Self {
        Self { binder }
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    /// Resolve a parameter against a context known to carry a representation
    pub fn resolve_entity_argument<T, E>(
        &self,
        env: &EntityEnvironment<E>,
        parameter: &MethodParameter,
    ) -> Result<T>
    where
        T: InputType,
    {
        let name = parameter.argument_name()?;
        self.bind_from(env.representation(), name)
    }

    fn bind_from<T: InputType>(&self, representation: &Representation, name: &str) -> Result<T> {
        let value = ArgumentValue::lookup(representation.as_map(), name);
        tracing::debug!(
            typename = representation.typename(),
            argument = name,
            omitted = value.is_omitted(),
            "binding entity argument"
        );
        Ok(self.binder.bind(name, value)?)
    }
}

impl<B: ArgumentBinder> MethodArgumentResolver for EntityArgumentMethodArgumentResolver<B> {
    fn supports_parameter(&self, parameter: &MethodParameter) -> bool {
        parameter.is_argument()
    }

    fn resolve_argument<T, E>(&self, env: &E, parameter: &MethodParameter) -> Result<T>
    where
        T: InputType,
        E: DataFetchingEnvironment + ?Sized,
    {
        let name = parameter.argument_name()?;
        match env.representation() {
            Some(representation) => self.bind_from(representation, name),
            None => {
                tracing::error!(
                    field = env.field_name(),
                    argument = name,
                    "entity argument resolved without a representation, environment was not wrapped"
                );
                Err(GraphQLError::MissingRepresentation(name.to_string()))
            }
        }
    }
}
