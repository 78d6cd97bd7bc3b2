//! Token signing secret resolution.
//!
//! The secret comes from `JWT_SEED` (inline) or `JWT_SEED_FILE` (a path),
//! read once at start-up. Debug builds fall back to a random key when neither
//! is set; release builds refuse to.

use std::fmt;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

pub(crate) const SEED_ENV: &str = "JWT_SEED";
pub(crate) const SEED_FILE_ENV: &str = "JWT_SEED_FILE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "JWT_ALLOW_EPHEMERAL";
/// Shortest secret accepted by release builds, in bytes.
pub const SIGNING_KEY_MIN_LEN: usize = 32;
const EPHEMERAL_KEY_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for signing key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing secrets by generating a throwaway key.
    Debug,
    /// Requires a configured secret of at least [`SIGNING_KEY_MIN_LEN`] bytes.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use authgate::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Secret bytes for HMAC token signing. Wiped on drop.
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
    ephemeral: bool,
}

impl SigningKey {
    fn configured(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            ephemeral: false,
        }
    }

    fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes: Zeroizing::new(bytes),
            ephemeral: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Whether the key was generated for this process only.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Errors raised while resolving the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum SigningKeyError {
    /// Neither `JWT_SEED` nor `JWT_SEED_FILE` is set and no fallback applies.
    #[error("missing signing secret: set {SEED_ENV} or {SEED_FILE_ENV}")]
    MissingSecret,
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is shorter than release builds accept.
    #[error("signing secret from {origin} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        origin: &'static str,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not run with a throwaway key.
    #[error("{ALLOW_EPHEMERAL_ENV} must not be enabled in release builds")]
    EphemeralNotAllowed,
}

/// Resolve the token signing secret from the environment.
///
/// `JWT_SEED` wins over `JWT_SEED_FILE` when both are set. Without either,
/// debug builds generate a random 64-byte key unless `JWT_ALLOW_EPHEMERAL=0`
/// opts out; release builds fail.
///
/// # Examples
///
/// ```rust
/// use authgate::config::{BuildMode, signing_key_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SEED" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     _ => None,
/// });
///
/// let key = signing_key_from_env(&env, BuildMode::Release).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// assert!(!key.is_ephemeral());
/// ```
pub fn signing_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningKey, SigningKeyError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;

    if let Some(seed) = env.string(SEED_ENV).map(Zeroizing::new) {
        if env.string(SEED_FILE_ENV).is_some() {
            debug!("{SEED_ENV} and {SEED_FILE_ENV} both set; using {SEED_ENV}");
        }
        return checked(seed.as_bytes().to_vec(), SEED_ENV, mode);
    }

    if let Some(path) = env.string(SEED_FILE_ENV) {
        let path = PathBuf::from(path);
        let bytes = std::fs::read(&path)
            .map_err(|source| SigningKeyError::KeyRead { path, source })?;
        return checked(bytes, SEED_FILE_ENV, mode);
    }

    if allow_ephemeral {
        warn!("no signing secret configured; using a temporary key (dev only)");
        return Ok(SigningKey::generate());
    }
    Err(SigningKeyError::MissingSecret)
}

fn checked(
    mut bytes: Vec<u8>,
    origin: &'static str,
    mode: BuildMode,
) -> Result<SigningKey, SigningKeyError> {
    let length = bytes.len();
    if length == 0 || (!mode.is_debug() && length < SIGNING_KEY_MIN_LEN) {
        bytes.zeroize();
        return Err(SigningKeyError::KeyTooShort {
            origin,
            length,
            min_len: SIGNING_KEY_MIN_LEN,
        });
    }
    if length < SIGNING_KEY_MIN_LEN {
        warn!(origin, length, "signing secret shorter than recommended");
    }
    Ok(SigningKey::configured(bytes))
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SigningKeyError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(mode.is_debug());
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(SigningKeyError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(value = %value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to enabled");
            Ok(true)
        }
        (None, BuildMode::Release) => Err(SigningKeyError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
