use bytes::Bytes;
use corezoid_auth_hyper::{prelude::*, *};
use http::Request;
use http_body_util::{BodyExt, Full};

const API_URL: &str = "https://api.corezoid.com/api/2/json";
const UPLOAD_URL: &str = "https://api.corezoid.com/api/2/upload";
const LOGIN: u64 = 42;
const SECRET: &str = "s3cr3t";
const SA_TOKEN: &str = "service-account-token";

const FORM_CONTENT_TYPE: &str = "multipart/form-data; boundary=----WebKitFormBoundary7MA4YWxkTrZu0gW";
const FORM_BODY: &str = "------WebKitFormBoundary7MA4YWxkTrZu0gW\r\n\
Content-Disposition: form-data; name=\"conv_id\"\r\n\
\r\n\
123456\r\n\
------WebKitFormBoundary7MA4YWxkTrZu0gW\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"tasks.csv\"\r\n\
Content-Type: text/csv\r\n\
\r\n\
id,name\r\n\
1,first\r\n\
------WebKitFormBoundary7MA4YWxkTrZu0gW--\r\n";

fn build_json_request() -> Request<Full<Bytes>> {
  Request::builder()
    .method("POST")
    .uri(API_URL)
    .header("content-type", "application/json")
    .body(Full::new(Bytes::from_static(
      br#"{"ops":[{"type":"create","obj":"task","conv_id":123456,"data":{"id":"1"}}]}"#,
    )))
    .unwrap()
}

fn build_form_request() -> Request<Full<Bytes>> {
  Request::builder()
    .method("POST")
    .uri(UPLOAD_URL)
    .header("content-type", FORM_CONTENT_TYPE)
    .body(Full::new(Bytes::from_static(FORM_BODY.as_bytes())))
    .unwrap()
}

/// Sender side: the strategy is picked once and every request goes through it right before dispatch
async fn dispatch(auth: &Auth, mut req: Request<Full<Bytes>>) -> HyperAuthResult<Request<Full<Bytes>>> {
  auth.sign(&mut req).await?;
  Ok(req)
}

async fn scenario_api_key() {
  println!("--------------  Scenario: keyed signature  --------------");
  let auth = Auth::from(ApiKeyAuth::new(LOGIN, SECRET));

  let req = dispatch(&auth, build_json_request()).await.unwrap();
  println!("Signed json request uri:\n{}", req.uri());

  let req = dispatch(&auth, build_form_request()).await.unwrap();
  println!("Signed multipart request uri:\n{}", req.uri());
  println!(
    "Canonical multipart payload used for the signature:\n{:?}",
    String::from_utf8_lossy(&canonicalize_multipart(FORM_BODY.as_bytes()))
  );

  // the body is sent as it was built
  let body = req.into_body().collect().await.unwrap().to_bytes();
  assert_eq!(body, FORM_BODY.as_bytes());
  println!("Multipart body is left intact ({} bytes)", body.len());
}

async fn scenario_sa_token() {
  println!("--------------  Scenario: service-account token  --------------");
  let auth = Auth::from(SaTokenAuth::new(SA_TOKEN));

  let req = dispatch(&auth, build_json_request()).await.unwrap();
  println!("Request header signed with bearer token:\n{:#?}", req.headers());
  println!("Request uri is unchanged:\n{}", req.uri());
}

#[tokio::main]
async fn main() {
  scenario_api_key().await;
  println!("-------------------------------------------------------------");
  scenario_sa_token().await;
  println!("-------------------------------------------------------------");
}
