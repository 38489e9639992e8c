//! # corezoid-auth-hyper
//!
//! `corezoid-auth-hyper` is a crate that provides a convenient API for `Hyper` users to authenticate requests sent to the
//! Corezoid API. This crate extends hyper's http request with the ability to be signed right before dispatch, either with
//! a keyed signature appended to the url path or with a bearer token header.
//!
//! ## Async-first design
//!
//! The primary API is async via [`RequestSigner`], implemented for [`ApiKeyAuth`](prelude::ApiKeyAuth),
//! [`SaTokenAuth`](prelude::SaTokenAuth) and the strategy selector [`Auth`](prelude::Auth).
//! A single signer can be shared by concurrent requests.
//!
//! ## Blocking API
//!
//! When the `blocking` feature is enabled (on by default), synchronous wrappers are provided via [`RequestSignerSync`].
//! These use `futures::executor::block_on` internally and are intended **exclusively for non-async contexts**.
//!
//! # Panics
//!
//! Calling any `*_sync` method from within an async runtime (e.g. inside a `tokio::spawn` task)
//! will panic. If you are already in an async context, use the async methods directly.

mod error;
mod hyper_auth;
mod hyper_body;

pub use corezoid_auth::prelude;
pub use error::{HyperAuthError, HyperAuthResult};
pub use hyper_auth::RequestSigner;
#[cfg(feature = "blocking")]
pub use hyper_auth::RequestSignerSync;
pub use hyper_body::BodyBytes;

/* ----------------------------------------------------------------- */
#[cfg(test)]
mod tests {
  use super::{prelude::*, *};
  use bytes::Bytes;
  use http::Request;
  use http_body_util::{BodyExt, Full};

  const FORM_CONTENT_TYPE: &str = "multipart/form-data; boundary=----WebKitFormBoundary7MA4YWxkTrZu0gW";
  const FORM_BODY: &str = "------WebKitFormBoundary7MA4YWxkTrZu0gW\r\n\
Content-Disposition: form-data; name=\"conv_id\"\r\n\
\r\n\
123456\r\n\
------WebKitFormBoundary7MA4YWxkTrZu0gW--\r\n";

  fn build_request(content_type: &str, body: &'static str) -> Request<Full<Bytes>> {
    Request::builder()
      .method("POST")
      .uri("https://api.corezoid.com/api/2/upload?lang=en")
      .header("content-type", content_type)
      .body(Full::new(Bytes::from_static(body.as_bytes())))
      .unwrap()
  }

  /// Client side helper choosing the strategy once and never looking at it again
  struct Client {
    auth: Auth,
  }

  impl Client {
    async fn prepare(&self, mut req: Request<Full<Bytes>>) -> HyperAuthResult<Request<Full<Bytes>>> {
      self.auth.sign(&mut req).await?;
      Ok(req)
    }
  }

  #[tokio::test]
  async fn test_sign_form_request() {
    // show usage of signing a multipart upload with a keyed signature
    let client = Client {
      auth: ApiKeyAuth::new(42, "s3cr3t").into(),
    };
    let req = client.prepare(build_request(FORM_CONTENT_TYPE, FORM_BODY)).await.unwrap();

    let segments = req.uri().path().split('/').collect::<Vec<_>>();
    assert_eq!(segments[..5], ["", "api", "2", "upload", "42"]);
    let timestamp = segments[5].parse::<u64>().unwrap();
    let canonical = canonicalize_multipart(FORM_BODY.as_bytes());
    assert_eq!(canonical, b"Content-Disposition: form-data; name=\"conv_id\"\r\n123456".to_vec());
    assert_eq!(
      segments[6],
      ApiKeyAuth::new(42, "s3cr3t").signature(&canonical, timestamp)
    );
    assert_eq!(req.uri().query(), Some("lang=en"));

    // the body to be sent is the original one
    let body = req.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, FORM_BODY.as_bytes());
  }

  #[tokio::test]
  async fn test_sign_with_bearer_token() {
    // show usage of signing with a service-account token
    let client = Client {
      auth: SaTokenAuth::new("abc").into(),
    };
    let req = client
      .prepare(build_request("application/json", "{\"ops\":[]}"))
      .await
      .unwrap();

    assert_eq!(req.headers().get("authorization").unwrap(), "Bearer YWJj");
    assert_eq!(req.uri().path(), "/api/2/upload");
  }

  #[cfg(feature = "blocking")]
  #[test]
  fn test_sign_request_sync() {
    // show usage of sign_sync outside of any runtime
    let auth = Auth::from(ApiKeyAuth::new(42, "s3cr3t"));
    let mut req = build_request("application/json", "hello");
    auth.sign_at_sync(&mut req, 1_700_000_000).unwrap();
    assert_eq!(
      req.uri().path(),
      "/api/2/upload/42/1700000000/70467d34474fcde02e0b70dc0b84f507e46f3a75"
    );
  }
}
