//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is deliberately slow, so both hashing and verification run on
//! Tokio's blocking pool.

use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Salted bcrypt hashing at a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with the given work factor (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let cost = self.cost;
        let password = Zeroizing::new(password.to_owned());
        let hashed = task::spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost))
            .await
            .map_err(|err| PasswordHashError::hash(err.to_string()))?
            .map_err(|err| PasswordHashError::hash(err.to_string()))?;
        PasswordHash::new(hashed).map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.expose().to_owned();
        task::spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash))
            .await
            .map_err(|err| PasswordHashError::verify(err.to_string()))?
            .map_err(|err| PasswordHashError::verify(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(4)
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_against_their_password(hasher: BcryptPasswordHasher) {
        let hash = hasher.hash("secret1").await.expect("hash");
        assert!(hasher.verify("secret1", &hash).await.expect("verify"));
        assert!(!hasher.verify("secret2", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted(hasher: BcryptPasswordHasher) {
        let first = hasher.hash("secret1").await.expect("hash");
        let second = hasher.hash("secret1").await.expect("hash");
        assert_ne!(first.expose(), second.expose());
        assert!(!first.expose().contains("secret1"));
    }

    #[rstest]
    #[tokio::test]
    async fn unparseable_hash_is_a_verify_error(hasher: BcryptPasswordHasher) {
        let bogus = PasswordHash::new("plaintext").expect("non-empty");
        let err = hasher.verify("secret1", &bogus).await.expect_err("bad hash");
        assert!(matches!(err, PasswordHashError::Verify { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn out_of_range_cost_is_a_hash_error() {
        let err = BcryptPasswordHasher::new(99)
            .hash("secret1")
            .await
            .expect_err("invalid cost");
        assert!(matches!(err, PasswordHashError::Hash { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_hash_parses_and_rejects(hasher: BcryptPasswordHasher) {
        use crate::domain::credential_service::UNKNOWN_USER_HASH;

        let dummy = PasswordHash::new(UNKNOWN_USER_HASH).expect("non-empty");
        let matched = hasher.verify("secret1", &dummy).await.expect("well-formed hash");
        assert!(!matched);
    }

    #[rstest]
    fn default_cost_is_ten() {
        assert_eq!(BcryptPasswordHasher::default().cost(), 10);
    }

    #[rstest]
    #[tokio::test]
    async fn default_hasher_writes_cost_ten_hashes() {
        let hash = BcryptPasswordHasher::default()
            .hash("secret1")
            .await
            .expect("hash");
        assert!(hash.expose().starts_with("$2b$10$"), "{}", hash.expose());
    }
}
