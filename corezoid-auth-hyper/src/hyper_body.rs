use bytes::{BufMut, Bytes, BytesMut};
use http_body::Body;
use http_body_util::BodyExt;
use std::future::Future;

/* --------------------------------------- */
/// Read a body to completion without moving it out of its owner
pub trait BodyBytes: Body {
  /// Returns all data frames of the body concatenated. Trailers are skipped.
  /// On error the body stays where it is, already partially consumed, so that it cannot be mistaken for a fresh one.
  fn read_to_bytes(&mut self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send
  where
    Self: Sized + Send + Unpin,
    Self::Data: Send,
  {
    async move {
      let mut buf = BytesMut::new();
      while let Some(frame) = self.frame().await {
        if let Ok(data) = frame?.into_data() {
          buf.put(data);
        }
      }
      Ok(buf.freeze())
    }
  }
}

impl<T: ?Sized> BodyBytes for T where T: Body {}

/* --------------------------------------- */
