use crate::{multipart::canonicalize_multipart, trace::*};
use sha1::{Digest, Sha1};

/* -------------------------------- */
/// Keyed signature credentials: numeric account id (login) and shared secret.
/// The signature is `sha1(timestamp ‖ secret ‖ payload ‖ secret)` in lowercase hex and travels in the url path.
#[derive(Clone)]
pub struct ApiKeyAuth {
  login: u64,
  secret: String,
}

impl std::fmt::Debug for ApiKeyAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ApiKeyAuth")
      .field("login", &self.login)
      .field("secret", &"<redacted>")
      .finish()
  }
}

impl ApiKeyAuth {
  /// Create new keyed signature credentials
  pub fn new(login: u64, secret: impl Into<String>) -> Self {
    Self {
      login,
      secret: secret.into(),
    }
  }

  /// Account id embedded in signed paths
  pub fn login(&self) -> u64 {
    self.login
  }

  /// Compute the signature of the raw payload at the given unix timestamp
  pub fn signature(&self, payload: &[u8], timestamp: u64) -> String {
    let mut hasher = Sha1::new();
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(self.secret.as_bytes());
    hasher.update(payload);
    hasher.update(self.secret.as_bytes());
    hex::encode(hasher.finalize())
  }

  /// Compute the signature of a multipart/form-data payload, digesting its canonical form
  pub fn multipart_signature(&self, payload: &[u8], timestamp: u64) -> String {
    self.signature(&canonicalize_multipart(payload), timestamp)
  }

  /// Sign the body of a request at the given timestamp and return the path segment to be appended.
  /// `payload` is only read: the caller keeps transmitting the original bytes.
  pub fn sign_payload(&self, payload: &[u8], multipart: bool, timestamp: u64) -> SignedPath {
    let signature = if multipart {
      self.multipart_signature(payload, timestamp)
    } else {
      self.signature(payload, timestamp)
    };
    debug!(
      "Signed {} payload of {} bytes for login {} at {}",
      if multipart { "multipart" } else { "raw" },
      payload.len(),
      self.login,
      timestamp
    );
    SignedPath {
      login: self.login,
      timestamp,
      signature,
    }
  }
}

/* -------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Path segment carrying a keyed signature, formatted as `/{login}/{timestamp}/{signature}`
pub struct SignedPath {
  pub login: u64,
  pub timestamp: u64,
  /// 40 lowercase hex characters
  pub signature: String,
}

impl SignedPath {
  /// Append the signed segment to an existing url path
  pub fn append_to(&self, path: &str) -> String {
    format!("{path}{self}")
  }
}

impl std::fmt::Display for SignedPath {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "/{}/{}/{}", self.login, self.timestamp, self.signature)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TIMESTAMP: u64 = 1_700_000_000;

  #[test]
  fn signature_matches_known_answer() {
    let auth = ApiKeyAuth::new(42, "s3cr3t");
    // sha1("1700000000s3cr3thellos3cr3t")
    assert_eq!(
      auth.signature(b"hello", TIMESTAMP),
      "70467d34474fcde02e0b70dc0b84f507e46f3a75"
    );
    // sha1("1700000000s3cr3ts3cr3t")
    assert_eq!(auth.signature(b"", TIMESTAMP), "f3050f066885b07992fdad127cb394b156eb9749");
  }

  #[test]
  fn signature_is_deterministic() {
    let auth = ApiKeyAuth::new(42, "s3cr3t");
    let first = auth.signature(b"{\"ops\":[]}", TIMESTAMP);
    let second = auth.signature(b"{\"ops\":[]}", TIMESTAMP);
    assert_eq!(first, second);
    assert_eq!(first.len(), 40);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    assert_ne!(first, auth.signature(b"{\"ops\":[]}", TIMESTAMP + 1));
    assert_ne!(first, ApiKeyAuth::new(42, "other").signature(b"{\"ops\":[]}", TIMESTAMP));
  }

  #[test]
  fn multipart_signature_digests_canonical_form() {
    let auth = ApiKeyAuth::new(42, "s3cr3t");
    let body = b"------WebKitFormBoundaryXYZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nvalue1\r\n------WebKitFormBoundaryXYZ--\r\n";
    let canonical = b"Content-Disposition: form-data; name=\"a\"\r\nvalue1";

    assert_eq!(auth.multipart_signature(body, TIMESTAMP), auth.signature(canonical, TIMESTAMP));
    assert_eq!(
      auth.multipart_signature(body, TIMESTAMP),
      "bf8f43c5ad831280e3eede220864d260a950718e"
    );
    assert_ne!(auth.multipart_signature(body, TIMESTAMP), auth.signature(body, TIMESTAMP));
  }

  #[test]
  fn signed_path_format() {
    let auth = ApiKeyAuth::new(42, "s3cr3t");
    let signed = auth.sign_payload(b"hello", false, TIMESTAMP);
    assert_eq!(signed.login, 42);
    assert_eq!(signed.timestamp, TIMESTAMP);
    assert_eq!(
      signed.to_string(),
      "/42/1700000000/70467d34474fcde02e0b70dc0b84f507e46f3a75"
    );
    assert_eq!(
      signed.append_to("/api/2/json"),
      "/api/2/json/42/1700000000/70467d34474fcde02e0b70dc0b84f507e46f3a75"
    );
  }

  #[test]
  fn empty_multipart_payload_signs_empty_string() {
    let auth = ApiKeyAuth::new(42, "s3cr3t");
    let signed = auth.sign_payload(b"", true, TIMESTAMP);
    assert_eq!(signed.signature, auth.signature(b"", TIMESTAMP));
  }

  #[test]
  fn debug_redacts_secret() {
    let auth = ApiKeyAuth::new(7, "very-secret");
    let debug = format!("{auth:?}");
    assert!(debug.contains("login: 7"));
    assert!(!debug.contains("very-secret"));
  }
}
