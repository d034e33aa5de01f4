use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::Hmac;
use hmac::Mac;
use serde::Serialize;
use sha2::Sha256;

use super::claims::Claims;
use super::errors::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime: seven days.
pub const DEFAULT_TTL_SECONDS: i64 = 7 * 24 * 3600;

/// Fixed token header. HMAC-SHA256 is the only supported scheme.
#[derive(Debug, Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

const HEADER: Header = Header {
    alg: "HS256",
    typ: "JWT",
};

/// Token encoder/decoder.
///
/// Produces compact `header.claims.signature` strings: each segment is
/// unpadded base64url, and the signature is an HMAC-SHA256 over the literal
/// joined first two segments. Verification recomputes the MAC over the
/// received segments as-is, so a re-serialized but semantically equal payload
/// never passes.
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    /// Create a new codec with a signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    /// Encode claims into a signed token with the default lifetime.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        self.encode_with_ttl(claims, DEFAULT_TTL_SECONDS)
    }

    /// Encode claims into a signed token expiring `ttl_seconds` from now.
    ///
    /// `iat` and `exp` are stamped after the caller's claims are copied, so
    /// caller-supplied values for either are overwritten. A negative TTL
    /// yields an already-expired token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claim serialization failed
    pub fn encode_with_ttl(&self, claims: &Claims, ttl_seconds: i64) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();

        let mut claims = claims.clone();
        claims.iat = Some(now);
        claims.exp = Some(now + ttl_seconds);

        let header_json = serde_json::to_string(&HEADER)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
        let claims_json = serde_json::to_string(&claims)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.sign(signing_input.as_bytes());

        Ok(format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Decode and validate a token.
    ///
    /// The signature is verified over the literal received segments before
    /// the claim payload is parsed or trusted.
    ///
    /// # Errors
    /// * `Malformed` - Not three segments, or claims are not base64url JSON
    /// * `InvalidSignature` - Signature mismatch (tampered token or wrong key)
    /// * `Expired` - Signature valid but `exp` has passed
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::Malformed(format!(
                "expected 3 dot-separated segments, got {}",
                segments.len()
            )));
        }
        let (header_part, claims_part, signature_part) = (segments[0], segments[1], segments[2]);

        let signature = URL_SAFE_NO_PAD
            .decode(signature_part)
            .map_err(|_| TokenError::InvalidSignature)?;

        let signing_input = format!("{}.{}", header_part, claims_part);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can accept any key length");
        mac.update(signing_input.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            return Err(TokenError::InvalidSignature);
        }

        let claims_json = URL_SAFE_NO_PAD
            .decode(claims_part)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;
        let claims: Claims = serde_json::from_slice(&claims_json)
            .map_err(|e| TokenError::Malformed(e.to_string()))?;

        if let Some(exp) = claims.exp {
            if Utc::now().timestamp() > exp {
                return Err(TokenError::Expired);
            }
        }

        Ok(claims)
    }

    fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can accept any key length");
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_encode_and_decode() {
        let codec = TokenCodec::new(SECRET);
        let claims = Claims::for_user("user123", "alice@example.com".to_string());

        let token = codec.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded.sub, Some("user123".to_string()));
        assert_eq!(decoded.email(), Some("alice@example.com".to_string()));

        let iat = decoded.iat.expect("iat missing");
        let exp = decoded.exp.expect("exp missing");
        assert_eq!(exp - iat, DEFAULT_TTL_SECONDS);
    }

    #[test]
    fn test_encode_overrides_caller_timestamps() {
        let codec = TokenCodec::new(SECRET);
        let mut claims = Claims::new().with_subject("user123");
        claims.exp = Some(9_999_999_999);
        claims.iat = Some(0);

        let token = codec.encode_with_ttl(&claims, 60).unwrap();
        let decoded = codec.decode(&token).unwrap();

        let iat = decoded.iat.unwrap();
        let exp = decoded.exp.unwrap();
        assert_ne!(exp, 9_999_999_999);
        assert_ne!(iat, 0);
        assert_eq!(exp - iat, 60);
    }

    #[test]
    fn test_decode_expired_token() {
        let codec = TokenCodec::new(SECRET);
        let claims = Claims::new().with_subject("user123");

        let token = codec.encode_with_ttl(&claims, -1).unwrap();
        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_decode_tampered_segments() {
        let codec = TokenCodec::new(SECRET);
        let claims = Claims::new().with_subject("user123");
        let token = codec.encode(&claims).unwrap();

        let segments: Vec<&str> = token.split('.').collect();

        // Flip a character in the header segment
        let tampered_header = format!("x{}.{}.{}", &segments[0][1..], segments[1], segments[2]);
        assert_eq!(
            codec.decode(&tampered_header),
            Err(TokenError::InvalidSignature)
        );

        // Flip a character in the claims segment
        let tampered_claims = format!("{}.x{}.{}", segments[0], &segments[1][1..], segments[2]);
        assert_eq!(
            codec.decode(&tampered_claims),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let codec2 = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let token = codec1
            .encode(&Claims::new().with_subject("user123"))
            .unwrap();

        assert_eq!(codec2.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        let codec = TokenCodec::new(SECRET);

        assert!(matches!(
            codec.decode("only.two"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            codec.decode("one.two.three.four"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(codec.decode(""), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_decode_unparseable_claims() {
        let codec = TokenCodec::new(SECRET);

        // Correctly signed token whose claims segment is not JSON
        let header_json = serde_json::to_string(&HEADER).unwrap();
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode("not json")
        );
        let signature = codec.sign(signing_input.as_bytes());
        let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature));

        assert!(matches!(
            codec.decode(&token),
            Err(TokenError::Malformed(_))
        ));
    }
}
