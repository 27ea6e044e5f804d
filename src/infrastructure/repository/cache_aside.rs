//! Cache-aside entity repository
//!
//! Reads go cache first and fall back to the store, populating the cache on
//! a miss. Writes delete the cache entry before touching the store. Creates
//! warm the cache once the row is durable.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::authorization::{Actor, AuthorizationGate};
use crate::domain::cache::{Cache, CacheKey, DEFAULT_NAMESPACE};
use crate::domain::store::{
    Conditions, Document, Entity, EntityStore, Patch, Transaction, TransactionScope,
};
use crate::domain::validation::{RuleSet, Validator};
use crate::domain::DomainError;

/// Cache settings shared by every repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub ttl: Duration,
    pub namespace: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl RepositoryConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Repository for one entity type over a store, a cache and an authorization gate
pub struct CacheAsideRepository<E, S> {
    store: S,
    cache: Arc<dyn Cache>,
    gate: Arc<AuthorizationGate>,
    validator: Arc<dyn Validator>,
    config: RepositoryConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S: Clone> Clone for CacheAsideRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: Arc::clone(&self.cache),
            gate: Arc::clone(&self.gate),
            validator: Arc::clone(&self.validator),
            config: self.config.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, S: fmt::Debug> fmt::Debug for CacheAsideRepository<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheAsideRepository")
            .field("entity_type", &E::TYPE_NAME)
            .field("store", &self.store)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

impl<E, S> CacheAsideRepository<E, S>
where
    E: Entity,
    S: EntityStore<E>,
{
    pub fn new(
        store: S,
        cache: Arc<dyn Cache>,
        gate: Arc<AuthorizationGate>,
        validator: Arc<dyn Validator>,
        config: RepositoryConfig,
    ) -> Self {
        Self {
            store,
            cache,
            gate,
            validator,
            config,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn cache_key(&self, id: &E::Id) -> CacheKey {
        CacheKey::for_entity::<E>(&self.config.namespace, id)
    }

    /// Loads an entity through the cache and checks `action` against the gate
    ///
    /// A denial leaves the cache as the lookup left it.
    pub async fn fetch_by_id_with_auth(
        &self,
        id: &E::Id,
        actor: &Actor,
        action: &str,
    ) -> Result<E, DomainError> {
        let entity = self.load(id).await?;

        self.gate.check(actor, action, &entity).into_result()?;

        Ok(entity)
    }

    /// Patches the entity where `extra_conditions` and its id both match
    ///
    /// Returns `NotFound` when nothing matched; the cache entry is gone
    /// either way.
    pub async fn update_with_conditions(
        &self,
        entity: &E,
        patch: &Patch,
        extra_conditions: &Conditions,
    ) -> Result<u64, DomainError> {
        self.invalidate(entity.id()).await?;

        let conditions = extra_conditions.clone().and(&Conditions::for_id(entity.id())?);
        let updated = self.store.update_where(&conditions, patch).await?;

        if updated == 0 {
            debug!(
                entity_type = E::TYPE_NAME,
                id = %entity.id(),
                "Conditional update matched nothing"
            );
            return Err(DomainError::not_found(E::TYPE_NAME, entity.id()));
        }

        Ok(updated)
    }

    pub async fn delete_with_cache_invalidation(&self, entity: &E) -> Result<u64, DomainError> {
        self.invalidate(entity.id()).await?;

        let deleted = self
            .store
            .delete_where(&Conditions::for_id(entity.id())?)
            .await?;

        if deleted == 0 {
            return Err(DomainError::not_found(E::TYPE_NAME, entity.id()));
        }

        Ok(deleted)
    }

    /// Validates input, inserts it, then warms the cache with the new entity
    ///
    /// Store failures propagate as-is; deciding whether to retry is up to
    /// the caller.
    pub async fn create_with_validation(
        &self,
        input: &Document,
        rules: &RuleSet,
    ) -> Result<E, DomainError> {
        let data = self.validate(input, rules)?;
        let entity = self.store.insert(data).await?;

        let key = self.cache_key(entity.id()).render();
        if let Err(e) = self.put(&key, &entity).await {
            warn!(key = %key, error = %e, "Failed to warm cache after create");
        }

        Ok(entity)
    }

    /// Like [`create_with_validation`](Self::create_with_validation), inside a transaction
    ///
    /// The cache is only warmed once the transaction commits.
    pub async fn create_with_validation_in<Tx>(
        &self,
        scope: &TransactionScope<Tx>,
        input: &Document,
        rules: &RuleSet,
    ) -> Result<E, DomainError>
    where
        Tx: Transaction + EntityStore<E>,
    {
        let data = self.validate(input, rules)?;
        let entity = scope.tx().insert(data).await?;

        let key = self.cache_key(entity.id()).render();
        let raw = serialize(&entity)?;
        let cache = Arc::clone(&self.cache);
        let ttl = self.config.ttl;

        scope
            .after_commit(Box::pin(async move {
                if let Err(e) = cache.set_raw(&key, &raw, ttl).await {
                    warn!(key = %key, error = %e, "Failed to warm cache after commit");
                }
            }))
            .await;

        Ok(entity)
    }

    /// Drops cached copies of the given ids; the store is not touched
    ///
    /// Best effort: cache failures are logged and the remaining ids are
    /// still attempted.
    pub async fn remove_cache_for_ids(&self, ids: &[E::Id]) {
        for id in ids {
            let key = self.cache_key(id).render();

            if let Err(e) = self.cache.delete(&key).await {
                warn!(key = %key, error = %e, "Failed to invalidate cache entry");
            }
        }
    }

    async fn load(&self, id: &E::Id) -> Result<E, DomainError> {
        let key = self.cache_key(id).render();

        if let Some(raw) = self.cache.get_raw(&key).await? {
            match serde_json::from_str::<E>(&raw) {
                Ok(entity) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(entity);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                    self.cache.delete(&key).await?;
                }
            }
        } else {
            debug!(key = %key, "Cache miss");
        }

        let entity = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(E::TYPE_NAME, id))?;

        self.put(&key, &entity).await?;

        Ok(entity)
    }

    async fn put(&self, key: &str, entity: &E) -> Result<(), DomainError> {
        self.cache
            .set_raw(key, &serialize(entity)?, self.config.ttl)
            .await
    }

    async fn invalidate(&self, id: &E::Id) -> Result<(), DomainError> {
        let key = self.cache_key(id).render();
        self.cache.delete(&key).await?;
        debug!(key = %key, "Cache entry invalidated");
        Ok(())
    }

    fn validate(&self, input: &Document, rules: &RuleSet) -> Result<Document, DomainError> {
        self.validator
            .validate(input, rules)
            .map_err(|errors| DomainError::invalid_input(errors.first_message()))
    }
}

fn serialize<E: Entity>(entity: &E) -> Result<String, DomainError> {
    serde_json::to_string(entity).map_err(|e| {
        DomainError::cache(format!("Failed to serialize {}: {}", E::TYPE_NAME, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::{FnPolicy, PolicyDecision};
    use crate::domain::cache::{CacheOp, MockCache};
    use crate::domain::store::fixtures::Note;
    use crate::domain::store::TransactionManager;
    use crate::domain::validation::RuleValidator;
    use crate::infrastructure::store::InMemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    type NoteRepository = CacheAsideRepository<Note, InMemoryStore<Note>>;

    /// Store wrapper counting lookups and capturing cache state at each write
    #[derive(Debug)]
    struct ObservedStore {
        inner: InMemoryStore<Note>,
        cache: Arc<MockCache>,
        finds: AtomicUsize,
        cache_ops_at_write: Mutex<Vec<Vec<CacheOp>>>,
        racing_reader: Option<(NoteRepository, Uuid)>,
        raced_value: Mutex<Option<Note>>,
    }

    impl ObservedStore {
        fn new(inner: InMemoryStore<Note>, cache: Arc<MockCache>) -> Self {
            Self {
                inner,
                cache,
                finds: AtomicUsize::new(0),
                cache_ops_at_write: Mutex::new(Vec::new()),
                racing_reader: None,
                raced_value: Mutex::new(None),
            }
        }

        fn finds(&self) -> usize {
            self.finds.load(Ordering::SeqCst)
        }

        async fn before_write(&self) {
            self.cache_ops_at_write
                .lock()
                .unwrap()
                .push(self.cache.ops());

            if let Some((reader, id)) = &self.racing_reader {
                let seen = reader
                    .fetch_by_id_with_auth(id, &Actor::new("reader"), "view")
                    .await
                    .unwrap();
                *self.raced_value.lock().unwrap() = Some(seen);
            }
        }
    }

    #[async_trait]
    impl EntityStore<Note> for ObservedStore {
        async fn find_by_id(&self, id: &Uuid) -> Result<Option<Note>, DomainError> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }

        async fn find_where(&self, conditions: &Conditions) -> Result<Vec<Note>, DomainError> {
            self.inner.find_where(conditions).await
        }

        async fn update_where(
            &self,
            conditions: &Conditions,
            patch: &Patch,
        ) -> Result<u64, DomainError> {
            self.before_write().await;
            self.inner.update_where(conditions, patch).await
        }

        async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError> {
            self.before_write().await;
            self.inner.delete_where(conditions).await
        }

        async fn insert(&self, data: Document) -> Result<Note, DomainError> {
            self.before_write().await;
            self.inner.insert(data).await
        }
    }

    fn note_rules() -> RuleSet {
        RuleSet::parse([
            ("title", "required|string|max:50"),
            ("owner", "required|string"),
            ("revision", "integer|min:1"),
        ])
        .unwrap()
    }

    fn note_input(title: &str, owner: &str) -> Document {
        json!({"title": title, "owner": owner, "revision": 1})
            .as_object()
            .cloned()
            .unwrap()
    }

    fn repository<S: EntityStore<Note>>(
        store: S,
        cache: &Arc<MockCache>,
        gate: AuthorizationGate,
    ) -> CacheAsideRepository<Note, S> {
        CacheAsideRepository::new(
            store,
            cache.clone(),
            Arc::new(gate),
            Arc::new(RuleValidator::new()),
            RepositoryConfig::default(),
        )
    }

    fn observed() -> (CacheAsideRepository<Note, ObservedStore>, Arc<MockCache>) {
        let cache = Arc::new(MockCache::new());
        let store = ObservedStore::new(InMemoryStore::new(), cache.clone());
        (repository(store, &cache, AuthorizationGate::new()), cache)
    }

    fn owner_only() -> AuthorizationGate {
        AuthorizationGate::new().with_policy::<Note>(FnPolicy::new(
            |actor: &Actor, _action: &str, note: &Note| {
                if note.owner == actor.id() {
                    PolicyDecision::Allow
                } else {
                    PolicyDecision::deny("not the owner")
                }
            },
        ))
    }

    fn alice() -> Actor {
        Actor::new("alice")
    }

    #[tokio::test]
    async fn test_fetch_after_create_is_a_cache_hit() {
        let (repo, cache) = observed();

        let created = repo
            .create_with_validation(&note_input("hello", "alice"), &note_rules())
            .await
            .unwrap();
        let fetched = repo
            .fetch_by_id_with_auth(&created.id, &alice(), "view")
            .await
            .unwrap();

        assert_eq!(fetched, created);
        assert_eq!(repo.store().finds(), 0);

        let key = repo.cache_key(&created.id).render();
        assert_eq!(key, format!("model_cache:note:{}", created.id));
        assert_eq!(cache.ttl_of(&key), Some(Duration::from_secs(600)));
    }

    #[tokio::test]
    async fn test_fetch_miss_loads_and_populates() {
        let (repo, cache) = observed();
        let note = repo.store().inner.insert(note_input("a", "alice")).await.unwrap();
        let key = repo.cache_key(&note.id).render();

        let first = repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await.unwrap();
        let second = repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await.unwrap();

        assert_eq!(first, note);
        assert_eq!(second, note);
        assert_eq!(repo.store().finds(), 1);
        assert!(cache.contains(&key));
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found_and_not_cached() {
        let (repo, cache) = observed();
        let id = Uuid::new_v4();

        let result = repo.fetch_by_id_with_auth(&id, &alice(), "view").await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound { ref entity_type, .. }) if entity_type == "note"
        ));
        assert!(!cache.contains(&repo.cache_key(&id).render()));
        assert_eq!(cache.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_denied_fetch_leaves_cache_alone() {
        let cache = Arc::new(MockCache::new());
        let store = InMemoryStore::<Note>::new();
        let note = store.insert(note_input("secret", "alice")).await.unwrap();
        let repo = repository(store, &cache, owner_only());

        repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await.unwrap();
        let ops_before = cache.ops();

        let result = repo
            .fetch_by_id_with_auth(&note.id, &Actor::new("mallory"), "view")
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Unauthorized { ref actor, ref action, .. })
                if actor == "mallory" && action == "view"
        ));

        let key = repo.cache_key(&note.id).render();
        let mut expected = ops_before;
        expected.push(CacheOp::Get(key.clone()));
        assert_eq!(cache.ops(), expected);
        assert!(cache.contains(&key));
    }

    #[tokio::test]
    async fn test_missing_policy_denied_when_required() {
        let cache = Arc::new(MockCache::new());
        let store = InMemoryStore::<Note>::new();
        let note = store.insert(note_input("a", "alice")).await.unwrap();
        let repo = repository(store, &cache, AuthorizationGate::new().require_policy(true));

        let result = repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_is_reloaded() {
        let store = InMemoryStore::<Note>::new();
        let note = store.insert(note_input("a", "alice")).await.unwrap();
        let key = format!("model_cache:note:{}", note.id);
        let cache = Arc::new(MockCache::new().with_raw_entry(&key, "{not json"));
        let repo = repository(store, &cache, AuthorizationGate::new());

        let fetched = repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await.unwrap();

        assert_eq!(fetched, note);
        assert_eq!(
            cache.ops(),
            vec![
                CacheOp::Get(key.clone()),
                CacheOp::Delete(key.clone()),
                CacheOp::Set(key.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn test_cache_errors_propagate_from_fetch() {
        let cache = Arc::new(MockCache::new().with_error("connection refused"));
        let repo = repository(InMemoryStore::<Note>::new(), &cache, AuthorizationGate::new());

        let result = repo.fetch_by_id_with_auth(&Uuid::new_v4(), &alice(), "view").await;
        assert!(matches!(result, Err(DomainError::Cache { .. })));
    }

    #[tokio::test]
    async fn test_update_invalidates_before_write() {
        let (repo, cache) = observed();
        let note = repo
            .create_with_validation(&note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        let key = repo.cache_key(&note.id).render();

        let updated = repo
            .update_with_conditions(&note, &Patch::new().set("title", "b"), &Conditions::new())
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let snapshots = repo.store().cache_ops_at_write.lock().unwrap().clone();
        let at_update = snapshots.last().unwrap();
        assert_eq!(at_update.last(), Some(&CacheOp::Delete(key.clone())));
        assert!(!cache.contains(&key));

        let fetched = repo.fetch_by_id_with_auth(&note.id, &alice(), "view").await.unwrap();
        assert_eq!(fetched.title, "b");
    }

    #[tokio::test]
    async fn test_racing_reader_sees_a_whole_value() {
        let cache = Arc::new(MockCache::new());
        let inner = InMemoryStore::<Note>::new();
        let note = inner.insert(note_input("before", "alice")).await.unwrap();

        let reader = repository(inner.clone(), &cache, AuthorizationGate::new());
        let mut store = ObservedStore::new(inner, cache.clone());
        store.racing_reader = Some((reader, note.id));
        let writer = repository(store, &cache, AuthorizationGate::new());

        writer
            .update_with_conditions(&note, &Patch::new().set("title", "after"), &Conditions::new())
            .await
            .unwrap();

        let raced = writer.store().raced_value.lock().unwrap().clone().unwrap();
        assert_eq!(raced, note);

        let stored = writer.store().inner.find_by_id(&note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "after");
        assert_eq!(stored.owner, note.owner);
    }

    #[tokio::test]
    async fn test_update_with_impossible_condition() {
        let (repo, cache) = observed();
        let note = repo
            .create_with_validation(&note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        let key = repo.cache_key(&note.id).render();
        assert!(cache.contains(&key));

        let stale = Conditions::new().eq("revision", 99);
        let result = repo
            .update_with_conditions(&note, &Patch::new().set("title", "b"), &stale)
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(!cache.contains(&key));

        let stored = repo.store().inner.find_by_id(&note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "a");
    }

    #[tokio::test]
    async fn test_update_counts_rows_matching_all_conditions() {
        let (repo, _cache) = observed();
        let note = repo
            .create_with_validation(&note_input("a", "alice"), &note_rules())
            .await
            .unwrap();

        let current = Conditions::new().eq("revision", 1);
        let patch = Patch::new().set("revision", 2);

        assert_eq!(repo.update_with_conditions(&note, &patch, &current).await.unwrap(), 1);
        assert!(repo.update_with_conditions(&note, &patch, &current).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_invalidates_then_removes() {
        let (repo, cache) = observed();
        let note = repo
            .create_with_validation(&note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        let key = repo.cache_key(&note.id).render();

        assert_eq!(repo.delete_with_cache_invalidation(&note).await.unwrap(), 1);

        let snapshots = repo.store().cache_ops_at_write.lock().unwrap().clone();
        assert_eq!(snapshots.last().unwrap().last(), Some(&CacheOp::Delete(key.clone())));
        assert!(!cache.contains(&key));

        let again = repo.delete_with_cache_invalidation(&note).await;
        assert!(matches!(again, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_create_touches_nothing() {
        let (repo, cache) = observed();

        let result = repo
            .create_with_validation(
                &json!({"owner": "alice"}).as_object().cloned().unwrap(),
                &note_rules(),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::InvalidInput { ref message }) if message == "The title field is required."
        ));
        assert!(repo.store().inner.is_empty().await);
        assert!(repo.store().cache_ops_at_write.lock().unwrap().is_empty());
        assert!(cache.ops().is_empty());
    }

    #[tokio::test]
    async fn test_create_drops_unruled_fields() {
        let (repo, _cache) = observed();
        let mut input = note_input("a", "alice");
        input.insert("id".to_string(), json!(Uuid::nil()));
        input.insert("admin".to_string(), json!(true));

        let note = repo.create_with_validation(&input, &note_rules()).await.unwrap();
        assert_ne!(note.id, Uuid::nil());
    }

    #[tokio::test]
    async fn test_create_store_failure_propagates_without_cache_write() {
        let cache = Arc::new(MockCache::new());
        let store = InMemoryStore::<Note>::with_unique_fields(["title"]);
        let repo = repository(store, &cache, AuthorizationGate::new());

        repo.create_with_validation(&note_input("same", "alice"), &note_rules())
            .await
            .unwrap();
        let ops_before = cache.ops();

        let result = repo
            .create_with_validation(&note_input("same", "bob"), &note_rules())
            .await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(cache.ops(), ops_before);
    }

    #[tokio::test]
    async fn test_transactional_create_warms_cache_after_commit() {
        let cache = Arc::new(MockCache::new());
        let store = InMemoryStore::<Note>::new();
        let repo = repository(store.clone(), &cache, AuthorizationGate::new());

        let scope = TransactionScope::new(store.begin().await.unwrap());
        let note = repo
            .create_with_validation_in(&scope, &note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        let key = repo.cache_key(&note.id).render();

        assert!(!cache.contains(&key));

        scope.commit().await.unwrap();

        assert!(cache.contains(&key));
        assert_eq!(store.find_by_id(&note.id).await.unwrap(), Some(note));
    }

    #[tokio::test]
    async fn test_transactional_create_rolled_back_leaves_no_cache_entry() {
        let cache = Arc::new(MockCache::new());
        let store = InMemoryStore::<Note>::new();
        let repo = repository(store.clone(), &cache, AuthorizationGate::new());

        let scope = TransactionScope::new(store.begin().await.unwrap());
        let note = repo
            .create_with_validation_in(&scope, &note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        scope.rollback().await.unwrap();

        assert!(cache.ops().is_empty());
        assert!(store.find_by_id(&note.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_cache_for_mixed_ids() {
        let (repo, cache) = observed();
        let present = repo
            .create_with_validation(&note_input("a", "alice"), &note_rules())
            .await
            .unwrap();
        let other = repo
            .create_with_validation(&note_input("b", "alice"), &note_rules())
            .await
            .unwrap();
        let absent = Uuid::new_v4();

        let ids = [present.id, absent, other.id];
        repo.remove_cache_for_ids(&ids).await;

        for id in &ids {
            assert!(!cache.contains(&repo.cache_key(id).render()));
        }
        assert_eq!(repo.store().inner.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_cache_for_ids_tolerates_cache_errors() {
        let (repo, cache) = observed();
        cache.set_error(Some("connection reset"));

        repo.remove_cache_for_ids(&[Uuid::new_v4(), Uuid::new_v4()])
            .await;

        assert_eq!(
            cache
                .ops()
                .iter()
                .filter(|op| matches!(op, CacheOp::Delete(_)))
                .count(),
            2
        );
    }
}
