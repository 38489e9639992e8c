use crate::{
  error::{HyperAuthError, HyperAuthResult},
  hyper_body::BodyBytes,
};
use bytes::Bytes;
use corezoid_auth::prelude::{is_multipart, unix_timestamp, ApiKeyAuth, Auth, SaTokenAuth, SignedPath};
use http::{header, uri::PathAndQuery, HeaderMap, HeaderValue, Request, Uri};
use http_body::Body;
use std::future::Future;
use tracing::{debug, warn};

// hyper's http specific extension to authenticate outbound requests

/* --------------------------------------- */
/// A trait to authenticate an outbound http request right before it is dispatched.
///
/// The request is mutated in place. If an error is returned the request must not be sent.
/// The body type must be constructible from [`Bytes`] since keyed signing reads the body and puts a fresh one back.
pub trait RequestSigner {
  type Error;

  /// Authenticate the request at the current time
  fn sign<B>(&self, req: &mut Request<B>) -> impl Future<Output = Result<(), Self::Error>> + Send
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    self.sign_at(req, unix_timestamp())
  }

  /// Authenticate the request with an artificial unix timestamp.
  /// Strategies not embedding a timestamp ignore it.
  fn sign_at<B>(&self, req: &mut Request<B>, timestamp: u64) -> impl Future<Output = Result<(), Self::Error>> + Send
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display;
}

/* --------------------------------------- */
#[cfg(feature = "blocking")]
/// Synchronous counterpart of [`RequestSigner`].
///
/// Every method delegates to the corresponding async method via `futures::executor::block_on`.
///
/// # Panics
///
/// All methods will panic if called from within an async runtime (e.g. a `tokio` task).
/// Use the async [`RequestSigner`] methods instead when you are already in an async context.
pub trait RequestSignerSync: RequestSigner {
  fn sign_sync<B>(&self, req: &mut Request<B>) -> Result<(), Self::Error>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display;

  fn sign_at_sync<B>(&self, req: &mut Request<B>, timestamp: u64) -> Result<(), Self::Error>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display;
}

#[cfg(feature = "blocking")]
impl<T> RequestSignerSync for T
where
  T: RequestSigner,
{
  fn sign_sync<B>(&self, req: &mut Request<B>) -> Result<(), Self::Error>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    futures::executor::block_on(self.sign(req))
  }

  fn sign_at_sync<B>(&self, req: &mut Request<B>, timestamp: u64) -> Result<(), Self::Error>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    futures::executor::block_on(self.sign_at(req, timestamp))
  }
}

/* --------------------------------------- */
impl RequestSigner for ApiKeyAuth {
  type Error = HyperAuthError;

  /// Read the whole body, sign it, append `/{login}/{timestamp}/{signature}` to the path and put the original bytes back.
  /// Path and headers are left untouched when the body cannot be read.
  async fn sign_at<B>(&self, req: &mut Request<B>, timestamp: u64) -> HyperAuthResult<()>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    let multipart = has_multipart_content_type(req.headers());
    let payload = req.body_mut().read_to_bytes().await.map_err(|e| {
      warn!("Failed to read request body for signing: {e}");
      HyperAuthError::HttpBodyError(e.to_string())
    })?;

    let signed = self.sign_payload(&payload, multipart, timestamp);
    // the transmitted body is always the original one, never the canonical multipart form
    *req.body_mut() = B::from(payload);

    let uri = append_signed_path(req.uri(), &signed)?;
    debug!("Signed request path: {}", uri.path());
    *req.uri_mut() = uri;
    Ok(())
  }
}

impl RequestSigner for SaTokenAuth {
  type Error = HyperAuthError;

  /// Set `Authorization: Bearer <base64(token)>`, replacing any existing value
  async fn sign_at<B>(&self, req: &mut Request<B>, _timestamp: u64) -> HyperAuthResult<()>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    let mut value = HeaderValue::from_str(&self.authorization_value())?;
    value.set_sensitive(true);
    req.headers_mut().insert(header::AUTHORIZATION, value);
    Ok(())
  }
}

impl RequestSigner for Auth {
  type Error = HyperAuthError;

  async fn sign_at<B>(&self, req: &mut Request<B>, timestamp: u64) -> HyperAuthResult<()>
  where
    B: Body + From<Bytes> + Send + Unpin,
    B::Data: Send,
    B::Error: std::fmt::Display,
  {
    debug!("Authenticating request with {self}");
    match self {
      Auth::ApiKey(auth) => auth.sign_at(req, timestamp).await,
      Auth::SaToken(auth) => auth.sign_at(req, timestamp).await,
    }
  }
}

/* --------------------------------------- */
/// Check the first content-type value for multipart/form-data.
/// Values that are not valid visible ascii are matched byte-wise.
fn has_multipart_content_type(headers: &HeaderMap) -> bool {
  headers
    .get(header::CONTENT_TYPE)
    .map(|v| is_multipart(&String::from_utf8_lossy(v.as_bytes())))
    .unwrap_or(false)
}

/// Append the signed segment to the uri path, keeping scheme, authority and query as they are
fn append_signed_path(uri: &Uri, signed: &SignedPath) -> HyperAuthResult<Uri> {
  // `https://host` reports `/` as its path: sign it as an empty one, not as `//{login}/...`
  let base = match uri.path() {
    "/" => "",
    path => path,
  };
  let path = signed.append_to(base);
  let path_and_query = match uri.query() {
    Some(query) => format!("{path}?{query}"),
    None => path,
  };
  let mut parts = uri.clone().into_parts();
  parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
  Ok(Uri::from_parts(parts)?)
}

/* --------------------------------------- */
#[cfg(test)]
#[path = "hyper_auth_tests.rs"]
mod tests;
