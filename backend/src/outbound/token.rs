//! HS256 JSON Web Token codec for session tokens.
//!
//! Claims are `{ "id": <user uuid>, "iat": <secs>, "exp": <secs> }`. The codec
//! checks the signature, algorithm, and claim shape; it does not compare `exp`
//! with the wall clock, which is the session gate's job.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::ports::{SessionTokenCodec, TokenCodecError};
use crate::domain::{SessionClaims, SessionToken};

/// Signs and verifies session tokens with a shared HMAC secret.
pub struct JwtSessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtSessionCodec {
    /// Build a codec from raw secret bytes. The caller owns (and may zeroize)
    /// `secret` afterwards.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenCodecError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenCodecError::invalid_signature(),
        _ => TokenCodecError::malformed(error.to_string()),
    }
}

impl SessionTokenCodec for JwtSessionCodec {
    fn encode(&self, claims: &SessionClaims) -> Result<SessionToken, TokenCodecError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map(SessionToken::new)
            .map_err(|err| TokenCodecError::signing(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<SessionClaims, TokenCodecError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}
