//! # Session Gate
//!
//! Registration, login/logout, and identity resolution. Two resolution modes:
//!
//! * [`SessionGate::resolve_actor`] degrades to the anonymous identity and is
//!   only used on read paths.
//! * [`SessionGate::require_active`] is strict and gates every mutation.

use std::sync::Arc;

use domains::errors::{DomainError, Result};
use domains::models::{username_key, Caller, Registration, User, ANONYMOUS_ID, ANONYMOUS_USERNAME};
use domains::ports::UserRepository;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct SessionGate {
    users: Arc<dyn UserRepository>,
}

/// Field checks in fixed order; the first failure wins.
/// The "username taken" check needs the store and runs after these.
pub fn validate_registration(registration: &Registration) -> Result<()> {
    let invalid = |reason: &str| Err(DomainError::InvalidInput(reason.to_string()));

    if registration.first_name.is_empty() {
        return invalid("First name field cannot be empty. Please enter a valid first name.");
    }
    if registration.last_name.is_empty() {
        return invalid("Last name field cannot be empty. Please enter a valid last name.");
    }
    if registration.username.is_empty() {
        return invalid("Username field cannot be empty. Please enter a valid username.");
    }
    if registration.username.chars().any(char::is_whitespace) {
        return invalid("Username cannot contain whitespace. Please enter a valid username.");
    }
    if username_key(&registration.username) == ANONYMOUS_USERNAME {
        return invalid("Username cannot be anonymous. Please enter a different username.");
    }
    Ok(())
}

impl SessionGate {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Idempotent upsert of the reserved anonymous user.
    pub async fn seed_anonymous(&self) -> Result<User> {
        match self.users.find_user(ANONYMOUS_ID).await? {
            Some(existing) if existing == User::anonymous() => Ok(existing),
            _ => {
                let anonymous = User::anonymous();
                self.users.save_user(&anonymous).await?;
                info!("seeded anonymous identity");
                Ok(anonymous)
            }
        }
    }

    /// The stored anonymous user, or the canonical one if the store was never seeded.
    pub async fn anonymous(&self) -> Result<User> {
        Ok(self
            .users
            .find_user(ANONYMOUS_ID)
            .await?
            .unwrap_or_else(User::anonymous))
    }

    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: Registration) -> Result<User> {
        validate_registration(&registration)?;
        if self
            .users
            .find_user_by_username(&registration.username)
            .await?
            .is_some()
        {
            warn!("username already taken");
            return Err(DomainError::InvalidInput(
                "Username exists. Please enter a different username.".to_string(),
            ));
        }

        let user = User::new(
            registration.username,
            registration.first_name,
            registration.last_name,
            registration.password,
        );
        self.users.save_user(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let mut user = self.find_user(username).await?;
        // the reserved identity has no real password and stays locked
        if user.is_anonymous() || user.password != password {
            warn!("invalid login details");
            return Err(DomainError::InvalidCredentials);
        }
        user.locked = false;
        self.users.save_user(&user).await?;
        info!("logged in");
        Ok(user)
    }

    /// Never checks a password. Idempotent.
    #[instrument(skip(self))]
    pub async fn logout(&self, username: &str) -> Result<User> {
        let mut user = self.find_user(username).await?;
        user.locked = true;
        self.users.save_user(&user).await?;
        info!("logged out");
        Ok(user)
    }

    /// Read-path resolution: unknown or locked callers become anonymous.
    pub async fn resolve_actor(&self, caller: &Caller) -> Result<User> {
        if let Caller::Named(username) = caller {
            if let Some(user) = self.users.find_user_by_username(username).await? {
                if !user.locked {
                    return Ok(user);
                }
            }
        }
        self.anonymous().await
    }

    /// Write-path resolution: the user must exist and be logged in.
    pub async fn require_active(&self, username: &str) -> Result<User> {
        let user = self.find_user(username).await?;
        if user.locked {
            warn!(username, "rejected: session locked");
            return Err(DomainError::SessionLocked(format!(
                "{username} must log in first"
            )));
        }
        Ok(user)
    }

    /// Lookup regardless of lock state.
    pub async fn find_user(&self, username: &str) -> Result<User> {
        self.users
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::MockUserRepository;
    use storage_adapters::MemoryStore;

    fn registration(first: &str, last: &str, username: &str) -> Registration {
        Registration {
            first_name: first.into(),
            last_name: last.into(),
            username: username.into(),
            password: "secret".into(),
        }
    }

    async fn gate() -> (SessionGate, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let gate = SessionGate::new(store.clone());
        gate.seed_anonymous().await.unwrap();
        (gate, store)
    }

    fn reason(result: Result<()>) -> String {
        match result {
            Err(DomainError::InvalidInput(reason)) => reason,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn validation_checks_run_in_fixed_order() {
        assert!(reason(validate_registration(&registration("", "", ""))).starts_with("First name"));
        assert!(reason(validate_registration(&registration("a", "", ""))).starts_with("Last name"));
        assert!(reason(validate_registration(&registration("a", "b", ""))).contains("cannot be empty"));
        assert!(reason(validate_registration(&registration("a", "b", "jim 123"))).contains("whitespace"));
        assert!(reason(validate_registration(&registration("a", "b", "jim\t1"))).contains("whitespace"));
        assert!(reason(validate_registration(&registration("a", "b", "AnonYmous"))).contains("anonymous"));
        assert!(validate_registration(&registration("a", "b", "jim123")).is_ok());
    }

    #[tokio::test]
    async fn register_creates_unlocked_user() {
        let (gate, store) = gate().await;
        let user = gate.register(registration("jack", "smith", "jack123")).await.unwrap();

        assert!(!user.locked);
        assert_eq!(store.count_users().await.unwrap(), 2);
        assert_eq!(gate.find_user("jack123").await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_case_insensitively() {
        let (gate, store) = gate().await;
        gate.register(registration("jack", "smith", "jack123")).await.unwrap();

        let err = gate
            .register(registration("jim", "brown", "JACK123"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(ref m) if m.contains("exists")));
        assert_eq!(store.count_users().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn anonymous_cannot_be_registered_even_when_seeded() {
        let (gate, _) = gate().await;
        let err = gate
            .register(registration("a", "b", "Anonymous"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(ref m) if m.contains("anonymous")));
    }

    #[tokio::test]
    async fn login_then_logout_leaves_user_locked() {
        let (gate, _) = gate().await;
        gate.register(registration("jack", "smith", "jack123")).await.unwrap();

        gate.logout("jack123").await.unwrap();
        assert!(gate.find_user("jack123").await.unwrap().locked);

        let user = gate.login("jack123", "secret").await.unwrap();
        assert!(!user.locked);

        gate.logout("jack123").await.unwrap();
        gate.logout("jack123").await.unwrap();
        assert!(gate.find_user("jack123").await.unwrap().locked);
    }

    #[tokio::test]
    async fn wrong_password_fails_and_keeps_lock() {
        let (gate, _) = gate().await;
        gate.register(registration("jack", "smith", "jack123")).await.unwrap();
        gate.logout("jack123").await.unwrap();

        let err = gate.login("jack123", "Secret").await.unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);
        assert!(gate.find_user("jack123").await.unwrap().locked);
    }

    #[tokio::test]
    async fn anonymous_identity_cannot_log_in() {
        let (gate, _) = gate().await;
        let err = gate.login("anonymous", "").await.unwrap_err();
        assert_eq!(err, DomainError::InvalidCredentials);
        assert!(gate.anonymous().await.unwrap().locked);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_for_login_and_logout() {
        let (gate, _) = gate().await;
        assert_eq!(
            gate.login("ghost", "pw").await.unwrap_err(),
            DomainError::UserNotFound("ghost".into())
        );
        assert_eq!(
            gate.logout("ghost").await.unwrap_err(),
            DomainError::UserNotFound("ghost".into())
        );
    }

    #[tokio::test]
    async fn resolve_actor_degrades_to_anonymous() {
        let (gate, _) = gate().await;
        gate.register(registration("jack", "smith", "jack123")).await.unwrap();

        let named = gate.resolve_actor(&Caller::named("jack123")).await.unwrap();
        assert_eq!(named.username, "jack123");

        let absent = gate.resolve_actor(&Caller::Anonymous).await.unwrap();
        assert!(absent.is_anonymous());

        let unknown = gate.resolve_actor(&Caller::named("ghost")).await.unwrap();
        assert!(unknown.is_anonymous());

        gate.logout("jack123").await.unwrap();
        let locked = gate.resolve_actor(&Caller::named("jack123")).await.unwrap();
        assert!(locked.is_anonymous());
    }

    #[tokio::test]
    async fn require_active_is_strict() {
        let (gate, _) = gate().await;
        gate.register(registration("jack", "smith", "jack123")).await.unwrap();
        assert!(gate.require_active("jack123").await.is_ok());

        gate.logout("jack123").await.unwrap();
        assert!(matches!(
            gate.require_active("jack123").await,
            Err(DomainError::SessionLocked(_))
        ));
        assert!(matches!(
            gate.require_active("anonymous").await,
            Err(DomainError::SessionLocked(_))
        ));
        assert!(matches!(
            gate.require_active("ghost").await,
            Err(DomainError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (gate, store) = gate().await;
        gate.seed_anonymous().await.unwrap();
        gate.seed_anonymous().await.unwrap();
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn seeding_repairs_an_unlocked_anonymous_record() {
        let mut repo = MockUserRepository::new();
        let mut tampered = User::anonymous();
        tampered.locked = false;
        repo.expect_find_user()
            .returning(move |_| Ok(Some(tampered.clone())));
        repo.expect_save_user()
            .withf(|user| user.is_anonymous() && user.locked)
            .times(1)
            .returning(|_| Ok(()));

        let gate = SessionGate::new(Arc::new(repo));
        assert!(gate.seed_anonymous().await.unwrap().locked);
    }

    #[tokio::test]
    async fn storage_failure_aborts_registration() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_user_by_username().returning(|_| Ok(None));
        repo.expect_save_user()
            .returning(|_| Err(DomainError::Storage("disk full".into())));

        let gate = SessionGate::new(Arc::new(repo));
        let err = gate
            .register(registration("jack", "smith", "jack123"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Storage("disk full".into()));
    }
}
