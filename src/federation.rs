//! Apollo Federation v2 utilities
//!
//! An entity reference arrives from the router as a *representation*: the
//! `__typename` plus the key fields that identify the entity. Handlers that
//! resolve the reference read their arguments from that map rather than
//! from the field's query arguments, so the execution context is decorated
//! with the representation before the handler runs.

use std::sync::Arc;

use async_graphql::{Any, Name, Value};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::environment::DataFetchingEnvironment;
use crate::GraphQLError;

/// Key fields identifying one entity reference
///
/// Immutable once built. Clones share the same underlying map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Representation(Arc<IndexMap<Name, Value>>);

impl Representation {
    pub fn new(fields: IndexMap<Name, Value>) -> Self {
        Self(Arc::new(fields))
    }

    /// Build from a GraphQL object value
    pub fn from_value(value: Value) -> crate::Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self::new(fields)),
            other => Err(GraphQLError::InvalidRepresentation(format!(
                "expected an object, found {}",
                other
            ))),
        }
    }

    /// Build from a JSON object, e.g. one entry of the `representations` list
    pub fn from_json(json: serde_json::Value) -> crate::Result<Self> {
        let value = Value::from_json(json)
            .map_err(|e| GraphQLError::InvalidRepresentation(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The `__typename` the router sent, if it is a string
    pub fn typename(&self) -> Option<&str> {
        match self.0.get("__typename") {
            Some(Value::String(typename)) => Some(typename),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &IndexMap<Name, Value> {
        &self.0
    }

    /// Whether both handles point at the same map instance
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl From<IndexMap<Name, Value>> for Representation {
    fn from(fields: IndexMap<Name, Value>) -> Self {
        Self::new(fields)
    }
}

impl TryFrom<Value> for Representation {
    type Error = GraphQLError;

    fn try_from(value: Value) -> crate::Result<Self> {
        Self::from_value(value)
    }
}

impl TryFrom<Any> for Representation {
    type Error = GraphQLError;

    fn try_from(any: Any) -> crate::Result<Self> {
        Self::from_value(any.0)
    }
}

/// Execution context carrying an entity representation
///
/// Everything except [`representation`](Self::representation) is answered
/// by the wrapped environment.
#[derive(Debug, Clone)]
pub struct EntityEnvironment<E> {
    inner: E,
    representation: Representation,
}

impl<E> EntityEnvironment<E> {
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_parts(self) -> (E, Representation) {
        (self.inner, self.representation)
    }
}

impl<E: DataFetchingEnvironment> DataFetchingEnvironment for EntityEnvironment<E> {
    fn field_name(&self) -> &str {
        self.inner.field_name()
    }

    fn alias(&self) -> Option<&str> {
        self.inner.alias()
    }

    fn path(&self) -> &str {
        self.inner.path()
    }

    fn arguments(&self) -> &IndexMap<Name, Value> {
        self.inner.arguments()
    }

    fn argument(&self, name: &str) -> Option<&Value> {
        self.inner.argument(name)
    }

    fn contains_argument(&self, name: &str) -> bool {
        self.inner.contains_argument(name)
    }

    fn representation(&self) -> Option<&Representation> {
        Some(&self.representation)
    }
}

/// Attach an entity representation to an execution context
pub fn wrap<E: DataFetchingEnvironment>(env: E, representation: Representation) -> EntityEnvironment<E> {
    tracing::trace!(
        field = env.field_name(),
        typename = representation.typename(),
        keys = representation.len(),
        "attaching entity representation"
    );
    EntityEnvironment {
        inner: env,
        representation,
    }
}

/// Context handed to [`EntityResolver`] implementations
pub type EntityContext<'a> = EntityEnvironment<&'a (dyn DataFetchingEnvironment + Sync)>;

/// Entity resolver trait for Apollo Federation
#[async_trait]
pub trait EntityResolver: Send + Sync {
    type Entity: Send;

    /// Resolve one entity reference
    ///
    /// Returns `None` when no entity matches the representation.
    async fn resolve_reference(&self, env: &EntityContext<'_>) -> crate::Result<Option<Self::Entity>>;
}

/// Resolve a batch of entity references against the same field context
///
/// Every representation gets its own [`EntityEnvironment`]; results keep
/// the order of `representations`.
pub async fn resolve_entities<R>(
    resolver: &R,
    env: &(dyn DataFetchingEnvironment + Sync),
    representations: Vec<Representation>,
) -> crate::Result<Vec<Option<R::Entity>>>
where
    R: EntityResolver + ?Sized,
{
    tracing::debug!(
        field = env.field_name(),
        count = representations.len(),
        "resolving entity references"
    );

    let mut entities = Vec::with_capacity(representations.len());
    for representation in representations {
        let entity_env = wrap(env, representation);
        entities.push(resolver.resolve_reference(&entity_env).await?);
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::FieldEnvironment;
    use async_graphql::value;

    fn representation(value: Value) -> Representation {
        Representation::from_value(value).unwrap()
    }

    #[test]
    fn test_wrap_returns_same_representation() {
        let rep = representation(value!({ "__typename": "Product", "id": "42" }));
        let env = wrap(FieldEnvironment::new("_entities"), rep.clone());

        assert!(Representation::ptr_eq(env.representation(), &rep));
        let via_trait = DataFetchingEnvironment::representation(&env).unwrap();
        assert!(Representation::ptr_eq(via_trait, &rep));
    }

    #[test]
    fn test_wrapped_environment_delegates() {
        let base = FieldEnvironment::new("_entities")
            .with_alias("entities")
            .with_path("_entities")
            .with_argument("representations", value!([{ "id": "1" }]));

        let first = wrap(&base, representation(value!({ "id": "1" })));
        let second = wrap(&base, representation(value!({ "sku": "abc" })));

        for env in [&first, &second] {
            assert_eq!(env.field_name(), base.field_name());
            assert_eq!(env.alias(), base.alias());
            assert_eq!(env.path(), base.path());
            assert_eq!(env.arguments(), base.arguments());
            assert_eq!(env.argument("representations"), base.argument("representations"));
            assert!(!env.contains_argument("id"));
        }
    }

    #[test]
    fn test_representation_rejects_non_object() {
        let err = Representation::from_value(value!(["id"])).unwrap_err();
        assert!(matches!(err, GraphQLError::InvalidRepresentation(_)));
    }

    #[test]
    fn test_representation_from_json() {
        let rep = Representation::from_json(serde_json::json!({
            "__typename": "User",
            "email": "ada@example.com",
            "region": null
        }))
        .unwrap();

        assert_eq!(rep.typename(), Some("User"));
        assert_eq!(rep.len(), 3);
        assert_eq!(rep.get("region"), Some(&Value::Null));
        assert!(!rep.contains_key("id"));
    }

    #[test]
    fn test_representation_from_any() {
        let rep = Representation::try_from(Any(value!({ "upc": "1" }))).unwrap();
        assert_eq!(rep.typename(), None);
        assert_eq!(rep.get("upc"), Some(&Value::from("1")));
    }

    struct EchoResolver;

    #[async_trait]
    impl EntityResolver for EchoResolver {
        type Entity = String;

        async fn resolve_reference(&self, env: &EntityContext<'_>) -> crate::Result<Option<String>> {
            Ok(match env.representation().get("id") {
                Some(Value::String(id)) => Some(format!("{}:{}", env.field_name(), id)),
                _ => None,
            })
        }
    }

    #[tokio::test]
    async fn test_resolve_entities_keeps_order() {
        let env = FieldEnvironment::new("_entities");
        let reps = vec![
            representation(value!({ "id": "2" })),
            representation(value!({ "sku": "x" })),
            representation(value!({ "id": "1" })),
        ];

        let entities = resolve_entities(&EchoResolver, &env, reps).await.unwrap();

        assert_eq!(
            entities,
            vec![
                Some("_entities:2".to_string()),
                None,
                Some("_entities:1".to_string()),
            ]
        );
    }

    struct FailingResolver;

    #[async_trait]
    impl EntityResolver for FailingResolver {
        type Entity = ();

        async fn resolve_reference(&self, _env: &EntityContext<'_>) -> crate::Result<Option<()>> {
            Err(GraphQLError::FederationError("subgraph unavailable".to_string()))
        }
    }

    #[test]
    fn test_resolve_entities_propagates_error() {
        let env = FieldEnvironment::new("_entities");
        let reps = vec![representation(value!({ "id": "1" }))];

        let result = tokio_test::block_on(resolve_entities(&FailingResolver, &env, reps));

        assert!(matches!(result, Err(GraphQLError::FederationError(_))));
    }
}
