//! # pleme-graphql-federation
//!
//! Apollo Federation entity argument binding for Pleme platform services.
//!
//! ## Features
//!
//! - **Entity Environment** - Attach a router representation to a field context
//! - **Argument Resolvers** - Bind handler parameters from query arguments or representations
//! - **Argument Binding** - async-graphql input coercion with explicit omission
//! - **Entity Resolution** - Resolve batches of entity references
//!
//! ## Usage
//!
//! ```rust
//! use async_graphql::value;
//! use pleme_graphql_federation::{
//!     wrap, EntityArgumentMethodArgumentResolver, FieldEnvironment, GraphQlArgumentBinder,
//!     MethodArgumentResolver, MethodParameter, Representation,
//! };
//!
//! let representation = Representation::from_value(value!({ "id": "42" })).unwrap();
//! let env = wrap(FieldEnvironment::new("_entities"), representation);
//! let resolver = EntityArgumentMethodArgumentResolver::new(GraphQlArgumentBinder::new());
//!
//! let region: Option<String> = resolver
//!     .resolve_argument(&env, &MethodParameter::argument(0, "region"))
//!     .unwrap();
//! assert_eq!(region, None);
//! ```

pub mod binding;
pub mod environment;
pub mod federation;
pub mod resolver;

pub use binding::{ArgumentBinder, ArgumentValue, BindError, GraphQlArgumentBinder};
pub use environment::{DataFetchingEnvironment, FieldEnvironment};
pub use federation::{
    resolve_entities, wrap, EntityContext, EntityEnvironment, EntityResolver, Representation,
};
pub use resolver::{
    Argument, ArgumentMethodArgumentResolver, EntityArgumentMethodArgumentResolver,
    MethodArgumentResolver, MethodParameter,
};

use thiserror::Error;

/// GraphQL errors
#[derive(Error, Debug)]
pub enum GraphQLError {
    /// Entity argument resolved on an environment that was never wrapped
    #[error("Expected an entity environment carrying a representation to bind argument '{0}'")]
    MissingRepresentation(String),

    #[error("Parameter at index {0} has no argument name")]
    UnnamedParameter(usize),

    #[error("Invalid representation: {0}")]
    InvalidRepresentation(String),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("Federation error: {0}")]
    FederationError(String),
}

/// Result type for GraphQL operations
pub type Result<T> = std::result::Result<T, GraphQLError>;
