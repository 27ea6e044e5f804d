//! Uniqueness-checked, conflict-retried account creation

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use super::password::PasswordHasher;
use crate::domain::store::{Conditions, Document, EntityStore, TransactionManager};
use crate::domain::user::{
    normalize_email, record_rules, registration_rules, RoleAssigner, User, UserSummary,
};
use crate::domain::DomainError;
use crate::infrastructure::repository::CacheAsideRepository;
use crate::infrastructure::retry::{RetryPolicy, TransactionalRetryExecutor};

/// Registers users through the retry executor
///
/// Each attempt checks for the email inside its own transaction and creates
/// the user there, so two racing registrations of one address cannot both
/// commit.
pub struct RegistrationService<S> {
    repository: Arc<CacheAsideRepository<User, S>>,
    hasher: Arc<dyn PasswordHasher>,
    roles: Arc<dyn RoleAssigner>,
    executor: TransactionalRetryExecutor,
    policy: RetryPolicy,
}

impl<S> RegistrationService<S>
where
    S: EntityStore<User> + TransactionManager,
    S::Tx: EntityStore<User>,
{
    pub fn new(
        repository: Arc<CacheAsideRepository<User, S>>,
        hasher: Arc<dyn PasswordHasher>,
        roles: Arc<dyn RoleAssigner>,
    ) -> Self {
        Self {
            repository,
            hasher,
            roles,
            executor: TransactionalRetryExecutor::new(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_executor(mut self, executor: TransactionalRetryExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, DomainError> {
        let email = normalize_email(email);
        let input = Document::from_iter([
            ("name".to_string(), json!(name)),
            ("email".to_string(), json!(email)),
            ("password".to_string(), json!(password)),
        ]);
        self.repository
            .validator()
            .validate(&input, &registration_rules())
            .map_err(|errors| DomainError::invalid_input(errors.first_message()))?;

        let password_hash = self.hasher.hash(password)?;
        let grants = self.roles.grants_for(&email);
        let record = Document::from_iter([
            ("name".to_string(), json!(name)),
            ("email".to_string(), json!(email)),
            ("password_hash".to_string(), json!(password_hash)),
            ("roles".to_string(), json!(grants.roles)),
            ("permissions".to_string(), json!(grants.permissions)),
            ("created_at".to_string(), json!(Utc::now().to_rfc3339())),
        ]);
        let rules = record_rules();

        let result = self
            .executor
            .run(self.repository.store(), &self.policy, |scope| {
                let repository = Arc::clone(&self.repository);
                let record = &record;
                let rules = &rules;
                let email = email.as_str();

                async move {
                    let taken = scope
                        .tx()
                        .exists_where(&Conditions::new().eq("email", email))
                        .await?;

                    if taken {
                        return Err(DomainError::conflict("duplicate email"));
                    }

                    repository
                        .create_with_validation_in(&scope, record, rules)
                        .await
                }
            })
            .await;

        match result {
            Ok(user) => {
                info!(user_id = %user.id(), "User registered");
                Ok(user.summary())
            }
            Err(DomainError::RetryExhausted { attempts } | DomainError::RetryTimeout { attempts }) => {
                warn!(attempts, "Registration gave up after repeated conflicts");
                Err(DomainError::registration_failed(
                    "Could not create the account, please try again",
                ))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::AuthorizationGate;
    use crate::domain::cache::MockCache;
    use crate::domain::user::{DefaultGrants, MockRoleAssigner, StaticRoleAssigner};
    use crate::domain::validation::RuleValidator;
    use crate::infrastructure::repository::RepositoryConfig;
    use crate::infrastructure::retry::mock::ManualClock;
    use crate::infrastructure::store::InMemoryStore;
    use crate::infrastructure::user::password::mock::PlainHasher;
    use std::time::Duration;

    struct Fixture {
        service: RegistrationService<InMemoryStore<User>>,
        store: InMemoryStore<User>,
        cache: Arc<MockCache>,
        clock: Arc<ManualClock>,
    }

    fn fixture_with_roles(roles: Arc<dyn RoleAssigner>) -> Fixture {
        let store = InMemoryStore::<User>::new();
        let cache = Arc::new(MockCache::new());
        let clock = Arc::new(ManualClock::new());
        let repository = Arc::new(CacheAsideRepository::new(
            store.clone(),
            cache.clone(),
            Arc::new(AuthorizationGate::new()),
            Arc::new(RuleValidator::new()),
            RepositoryConfig::default(),
        ));
        let service = RegistrationService::new(repository, Arc::new(PlainHasher), roles)
            .with_executor(TransactionalRetryExecutor::with_clock(clock.clone()));

        Fixture {
            service,
            store,
            cache,
            clock,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_roles(Arc::new(StaticRoleAssigner::default()))
    }

    #[tokio::test]
    async fn test_register_creates_user_with_default_grants() {
        let f = fixture();

        let summary = f
            .service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();

        assert_eq!(summary.name, "Ada");
        assert_eq!(summary.roles, vec!["user".to_string()]);

        let stored = f.store.find_by_id(&summary.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash(), "plain$long enough");
        assert_eq!(
            stored.permissions(),
            &["files.read".to_string(), "files.write".to_string()]
        );

        let key = format!("model_cache:user:{}", summary.id);
        assert!(f.cache.contains(&key));
        assert!(f.clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_role_assigner_sees_email() {
        let mut roles = MockRoleAssigner::new();
        roles
            .expect_grants_for()
            .withf(|email| email == "root@example.com")
            .times(1)
            .returning(|_| DefaultGrants::new(["admin"], Vec::<String>::new()));
        let f = fixture_with_roles(Arc::new(roles));

        let summary = f
            .service
            .register("Root", "root@example.com", "long enough")
            .await
            .unwrap();

        assert_eq!(summary.roles, vec!["admin".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_any_work() {
        let f = fixture();

        let result = f.service.register("Ada", "not-an-email", "long enough").await;
        assert!(matches!(
            result,
            Err(DomainError::InvalidInput { ref message })
                if message == "The email field must be a valid email address."
        ));

        let result = f.service.register("Ada", "ada@example.com", "short").await;
        assert!(matches!(result, Err(DomainError::InvalidInput { .. })));

        assert!(f.store.is_empty().await);
        assert!(f.cache.ops().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_fails_after_retries() {
        let f = fixture();
        f.service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();

        let result = f
            .service
            .register("Imposter", "ada@example.com", "other password")
            .await;

        assert!(matches!(result, Err(DomainError::RegistrationFailed { .. })));
        assert_eq!(f.clock.sleeps(), vec![Duration::from_secs(1); 4]);
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_failure_message_hides_conflict_details() {
        let f = fixture();
        f.service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();

        let error = f
            .service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap_err();

        assert!(!error.to_string().contains("duplicate"));
    }

    #[tokio::test]
    async fn test_email_case_does_not_make_a_new_account() {
        let f = fixture();
        let ada = f
            .service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();

        let result = f
            .service
            .register("Ada Again", "  ADA@Example.com ", "long enough")
            .await;

        assert!(matches!(result, Err(DomainError::RegistrationFailed { .. })));
        assert_eq!(f.store.len().await, 1);
        assert_eq!(ada.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_register_stores_normalized_email() {
        let f = fixture();

        let summary = f
            .service
            .register("Ada", " Ada@Example.COM", "long enough")
            .await
            .unwrap();

        assert_eq!(summary.email, "ada@example.com");
        let stored = f.store.find_by_id(&summary.id).await.unwrap().unwrap();
        assert_eq!(stored.email(), "ada@example.com");
    }

    #[tokio::test]
    async fn test_concurrent_registration_race() {
        let f = fixture();

        let (first, second) = tokio::join!(
            f.service.register("Ada", "race@example.com", "long enough"),
            f.service.register("Bob", "race@example.com", "long enough"),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::RegistrationFailed { .. }))));

        let stored = f
            .store
            .find_where(&Conditions::new().eq("email", "race@example.com"))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(f.cache.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_distinct_emails_both_succeed() {
        let f = fixture();

        let (first, second) = tokio::join!(
            f.service.register("Ada", "ada@example.com", "long enough"),
            f.service.register("Bob", "bob@example.com", "long enough"),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn test_custom_retry_policy() {
        let f = fixture();
        let service = f.service.with_retry_policy(RetryPolicy::new(2));
        service
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();

        let result = service.register("Ada", "ada@example.com", "long enough").await;

        assert!(matches!(result, Err(DomainError::RegistrationFailed { .. })));
        assert_eq!(f.clock.sleeps().len(), 1);
    }
}
