//! HS256 JSON Web Token implementation of the `TokenIssuer` port.
//!
//! Expiry is checked against the caller-supplied `now` rather than the
//! system clock so the domain's injected clock stays authoritative.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::UserId;
use crate::domain::ports::{IssuedToken, TokenError, TokenIssuer};

const SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issuer keyed by a random secret; tokens die with the process.
    pub fn ephemeral(ttl: TimeDelta) -> Self {
        let secret = Zeroizing::new(rand::random::<[u8; SECRET_LEN]>());
        Self::new(&secret[..], ttl)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: *user_id.as_uuid(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation()).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(),
            }
        })?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::expired());
        }
        Ok(UserId::from_uuid(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(b"test-secret", TimeDelta::minutes(10))
    }

    #[rstest]
    fn issued_tokens_verify_to_their_subject(issuer: JwtTokenIssuer) {
        let user = UserId::random();
        let now = Utc::now();
        let issued = issuer.issue(&user, now).expect("issue");
        assert_eq!(issued.expires_at, now + TimeDelta::minutes(10));
        assert_eq!(issuer.verify(&issued.token, now).expect("verify"), user);
    }

    #[rstest]
    fn tokens_expire_against_the_supplied_clock(issuer: JwtTokenIssuer) {
        let now = Utc::now();
        let issued = issuer.issue(&UserId::random(), now).expect("issue");
        let later = now + TimeDelta::minutes(11);
        assert_eq!(issuer.verify(&issued.token, later), Err(TokenError::Expired));
    }

    #[rstest]
    fn tokens_from_another_secret_are_invalid(issuer: JwtTokenIssuer) {
        let other = JwtTokenIssuer::new(b"other-secret", TimeDelta::minutes(10));
        let now = Utc::now();
        let issued = other.issue(&UserId::random(), now).expect("issue");
        assert_eq!(issuer.verify(&issued.token, now), Err(TokenError::Invalid));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-jwt")]
    #[case("a.b.c")]
    fn garbage_is_invalid(issuer: JwtTokenIssuer, #[case] token: &str) {
        assert_eq!(issuer.verify(token, Utc::now()), Err(TokenError::Invalid));
    }

    #[rstest]
    fn ephemeral_issuers_do_not_share_secrets() {
        let now = Utc::now();
        let first = JwtTokenIssuer::ephemeral(TimeDelta::minutes(1));
        let second = JwtTokenIssuer::ephemeral(TimeDelta::minutes(1));
        let issued = first.issue(&UserId::random(), now).expect("issue");
        assert!(first.verify(&issued.token, now).is_ok());
        assert_eq!(second.verify(&issued.token, now), Err(TokenError::Invalid));
    }
}
