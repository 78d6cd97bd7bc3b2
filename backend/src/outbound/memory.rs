//! Process-local `UserRepository` used when no database is configured.
//!
//! State lives behind one `RwLock`. `create` checks the email index and
//! inserts under the same write guard, so two concurrent registrations for
//! one address cannot both succeed. Data is lost when the process exits.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, UserId, UserRecord};

#[derive(Default)]
struct MemoryState {
    records: HashMap<UserId, UserRecord>,
    ids_by_email: HashMap<EmailAddress, UserId>,
    insertion_order: Vec<UserId>,
}

/// In-memory implementation of the `UserRepository` port.
///
/// # Examples
/// ```
/// use authgate::outbound::InMemoryUserRepository;
///
/// let repo = InMemoryUserRepository::default();
/// assert_eq!(repo.len(), 0);
/// ```
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryUserRepository {
    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.read().map_or(0, |state| state.records.len())
    }

    /// Whether no users are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, UserPersistenceError> {
        self.state
            .read()
            .map_err(|_| UserPersistenceError::connection("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, UserPersistenceError> {
        self.state
            .write()
            .map_err(|_| UserPersistenceError::connection("user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: &UserRecord) -> Result<(), UserPersistenceError> {
        let mut state = self.write()?;
        let user = record.user();
        if state.ids_by_email.contains_key(user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        if state.records.contains_key(user.id()) {
            return Err(UserPersistenceError::query("user id already exists"));
        }

        state
            .ids_by_email
            .insert(user.email().clone(), user.id().clone());
        state.insertion_order.push(user.id().clone());
        state.records.insert(user.id().clone(), record.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let state = self.read()?;
        Ok(state
            .ids_by_email
            .get(email)
            .and_then(|id| state.records.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, UserPersistenceError> {
        Ok(self.read()?.records.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        let state = self.read()?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.records.get(id))
            .cloned()
            .collect())
    }

    async fn set_active(
        &self,
        id: &UserId,
        is_active: bool,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let mut state = self.write()?;
        let Some(existing) = state.records.remove(id) else {
            return Ok(None);
        };
        let updated = UserRecord::new(
            existing.user().clone().with_active(is_active),
            existing.password_hash().clone(),
        );
        state.records.insert(id.clone(), updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{DisplayName, PasswordHash, User, UserParts};

    fn record(email: &str) -> UserRecord {
        let user = User::new(UserParts {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("email"),
            name: DisplayName::new("Ada").expect("name"),
            is_active: true,
            created_at: Utc::now(),
        });
        UserRecord::new(user, PasswordHash::new("$2b$04$hash").expect("hash"))
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::default()
    }

    #[rstest]
    #[tokio::test]
    async fn created_users_are_found_by_email_and_id(repo: InMemoryUserRepository) {
        let stored = record("ada@example.com");
        repo.create(&stored).await.expect("create");

        let email = EmailAddress::new("ADA@example.com").expect("email");
        let by_email = repo.find_by_email(&email).await.expect("lookup");
        let by_id = repo.find_by_id(stored.user().id()).await.expect("lookup");
        assert_eq!(by_email, Some(stored.clone()));
        assert_eq!(by_id, Some(stored));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected(repo: InMemoryUserRepository) {
        repo.create(&record("ada@example.com")).await.expect("first");
        let err = repo
            .create(&record("Ada@Example.com"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate_email("ada@example.com"));
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn find_all_preserves_insertion_order(repo: InMemoryUserRepository) {
        let first = record("a@x.com");
        let second = record("b@x.com");
        repo.create(&first).await.expect("create");
        repo.create(&second).await.expect("create");

        let all = repo.find_all().await.expect("list");
        assert_eq!(all, vec![first, second]);
    }

    #[rstest]
    #[tokio::test]
    async fn set_active_updates_known_users_only(repo: InMemoryUserRepository) {
        let stored = record("a@x.com");
        repo.create(&stored).await.expect("create");

        let updated = repo
            .set_active(stored.user().id(), false)
            .await
            .expect("update")
            .expect("user exists");
        assert!(!updated.user().is_active());

        let missing = repo
            .set_active(&UserId::random(), false)
            .await
            .expect("update");
        assert!(missing.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_for_one_email_admit_exactly_one() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let attempts = (0..16).map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.create(&record("race@x.com")).await })
        });

        let mut successes = 0;
        for handle in attempts {
            match handle.await.expect("task joined") {
                Ok(()) => successes += 1,
                Err(err) => assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. })),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }
}
