//! # corezoid-auth
//!
//! Request authentication for the Corezoid API, independent of any http library.
//!
//! Two strategies are provided:
//! - [`ApiKeyAuth`](prelude::ApiKeyAuth): a keyed SHA-1 signature over the timestamp, the shared secret and the request
//!   body, appended to the url path as `/{login}/{timestamp}/{signature}`. multipart/form-data bodies are digested in a
//!   canonical form, see [`canonicalize_multipart`](prelude::canonicalize_multipart).
//! - [`SaTokenAuth`](prelude::SaTokenAuth): a static token sent as `Authorization: Bearer <base64(token)>`.
//!
//! Applying them to actual requests is left to integration crates such as `corezoid-auth-hyper`.

mod api_key;
mod auth;
mod multipart;
mod sa_token;
mod trace;
mod util;

pub mod prelude {
  pub use crate::{
    api_key::{ApiKeyAuth, SignedPath},
    auth::Auth,
    multipart::{canonicalize_multipart, is_multipart, MULTIPART_FORM_DATA},
    sa_token::SaTokenAuth,
    util::unix_timestamp,
  };
}

/* ----------------------------------------------------------------- */
