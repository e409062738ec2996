//! HS512 signing and verification of access token claims

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};

/// Signs and verifies access tokens with a symmetric secret.
///
/// `verify` checks the signature and claim shape only. Expiry is left to the
/// caller so that refresh can accept an authentic but expired token.
#[derive(Clone)]
pub struct TokenSigner {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub const ALGORITHM: Algorithm = Algorithm::HS512;

    pub fn new(secret: &[u8], issuer: &str) -> Self {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Self {
            issuer: issuer.to_string(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encodes and signs claims as `header.claims.signature`
    ///
    /// Claims naming another issuer are refused, since `verify` would reject
    /// the resulting token.
    pub fn sign(&self, claims: &Claims) -> Result<String, DomainError> {
        if claims.iss != self.issuer {
            return Err(DomainError::Internal {
                message: format!(
                    "Refusing to sign claims for issuer {:?}, signer issues {:?}",
                    claims.iss, self.issuer
                ),
            });
        }

        encode(&Header::new(Self::ALGORITHM), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to sign access token: {}", e),
            }
        })
    }

    /// Recovers claims from an encoded token
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidSignature` - MAC mismatch, or a token advertising
    ///   any algorithm other than HS512
    /// * `TokenError::MalformedToken` - not a three-part token, or claims
    ///   missing / of the wrong type / from another issuer
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
                _ => TokenError::MalformedToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn claims() -> Claims {
        claims_from("tokenpair")
    }

    fn claims_from(issuer: &str) -> Claims {
        Claims::new_access_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            issuer,
            Utc::now(),
            Duration::hours(1),
        )
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let claims = claims();

        let token = signer.sign(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(signer.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_header_advertises_hs512() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let token = signer.sign(&claims()).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_verify_ignores_expiry() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let expired = Claims::new_access_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "tokenpair",
            Utc::now() - Duration::hours(3),
            Duration::hours(1),
        );

        let token = signer.sign(&expired).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), expired);
    }

    #[test]
    fn test_wrong_secret() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let other = TokenSigner::new(b"another-secret", "tokenpair");

        let token = other.sign(&claims()).unwrap();
        assert_eq!(signer.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_rejects_other_algorithm() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims(),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(signer.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_rejects_missing_refresh_id() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let partial = serde_json::json!({
            "sub": Uuid::new_v4(),
            "iat": 1,
            "exp": 4_000_000_000i64,
            "iss": "tokenpair",
        });
        let token = encode(
            &Header::new(Algorithm::HS512),
            &partial,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(signer.verify(&token), Err(TokenError::MalformedToken));
    }

    #[test]
    fn test_rejects_foreign_issuer() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        let foreign = TokenSigner::new(b"secret", "someone-else");

        let token = foreign.sign(&claims_from("someone-else")).unwrap();
        assert_eq!(signer.verify(&token), Err(TokenError::MalformedToken));
    }

    #[test]
    fn test_sign_refuses_claims_for_other_issuer() {
        let foreign = TokenSigner::new(b"secret", "someone-else");

        let result = foreign.sign(&claims());
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[test]
    fn test_rejects_garbage() {
        let signer = TokenSigner::new(b"secret", "tokenpair");
        assert_eq!(signer.verify("not-a-token"), Err(TokenError::MalformedToken));
        assert_eq!(signer.verify(""), Err(TokenError::MalformedToken));
    }
}
