//! Canonical form of `multipart/form-data` bodies used for keyed signatures.
//!
//! The remote API does not digest multipart bodies as transmitted. It first strips the
//! boundary lines, folds the blank line between part headers and part content, trims the
//! result and finally drops every line break except the one following a `Content-*` header
//! line. The canonical form only feeds the digest: the transmitted bytes are never touched.
//!
//! The steps are applied as literal byte scans, in order:
//! 1. remove every boundary delimiter (`-+`, word characters, optional trailing `-`s, CRLF). A delimiter
//!    may start anywhere, not only at the beginning of a line: `foo-bar\r\n` loses its `-bar\r\n` tail
//! 2. replace every `\r\n\r\n` with `\r\n`
//! 3. trim leading and trailing whitespace
//! 4. split on `\r\n` and re-join, keeping `\r\n` only after chunks starting with `Content-`
//!
//! Bodies that do not look like multipart at all simply pass through steps 1 and 2 unchanged.

use crate::trace::*;

/// Media type marker looked up in the `content-type` header
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

const CRLF: &[u8] = b"\r\n";
const DOUBLE_CRLF: &[u8] = b"\r\n\r\n";
const CONTENT_PREFIX: &[u8] = b"Content-";

/// Check if the given content-type value denotes a multipart/form-data body (case-sensitive substring match)
pub fn is_multipart(content_type: &str) -> bool {
  content_type.contains(MULTIPART_FORM_DATA)
}

/// Build the canonical multipart payload that is digested instead of the raw body
pub fn canonicalize_multipart(body: &[u8]) -> Vec<u8> {
  let stripped = strip_boundary_lines(body);
  let collapsed = replace_all(&stripped, DOUBLE_CRLF, CRLF);
  let trimmed = trim_whitespace(&collapsed);

  let mut canonical = Vec::with_capacity(trimmed.len());
  for chunk in split(trimmed, CRLF) {
    canonical.extend_from_slice(chunk);
    if chunk.starts_with(CONTENT_PREFIX) {
      canonical.extend_from_slice(CRLF);
    }
  }
  debug!(
    "Canonicalized multipart body: {} bytes -> {} bytes",
    body.len(),
    canonical.len()
  );
  canonical
}

/* --------------------------------------- */
/// Remove every occurrence of a boundary delimiter, i.e., one or more `-`, one or more word characters
/// (`[0-9A-Za-z_]`), zero or more `-`, then CRLF. Occurrences are searched leftmost-first and never overlap.
fn strip_boundary_lines(body: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(body.len());
  let mut pos = 0;
  let mut copied_until = 0;
  while pos < body.len() {
    match boundary_len_at(&body[pos..]) {
      Ok(len) => {
        out.extend_from_slice(&body[copied_until..pos]);
        pos += len;
        copied_until = pos;
      }
      Err(skip) => pos += skip,
    }
  }
  out.extend_from_slice(&body[copied_until..]);
  out
}

/// Length of the boundary delimiter starting exactly at the head of `input`.
/// Every run is maximal: a shorter run would leave a character that cannot continue the delimiter.
///
/// On a miss, returns how many bytes can be skipped before the next candidate start. Starting anywhere
/// inside the leading dash run reaches the same non-matching byte, so the whole run is skipped at once.
fn boundary_len_at(input: &[u8]) -> Result<usize, usize> {
  let dashes = run_len(input, |b| b == b'-');
  if dashes == 0 {
    return Err(1);
  }
  let word = run_len(&input[dashes..], is_word_byte);
  if word == 0 {
    return Err(dashes);
  }
  let trailing = run_len(&input[dashes + word..], |b| b == b'-');
  let end = dashes + word + trailing;
  if input[end..].starts_with(CRLF) {
    Ok(end + CRLF.len())
  } else {
    Err(dashes)
  }
}

fn run_len(input: &[u8], pred: impl Fn(u8) -> bool) -> usize {
  input.iter().take_while(|b| pred(**b)).count()
}

fn is_word_byte(b: u8) -> bool {
  b.is_ascii_alphanumeric() || b == b'_'
}

/// Replace all non-overlapping occurrences of `from` with `to`, scanning left to right
fn replace_all(input: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
  let mut out = Vec::with_capacity(input.len());
  let mut rest = input;
  while let Some(idx) = find(rest, from) {
    out.extend_from_slice(&rest[..idx]);
    out.extend_from_slice(to);
    rest = &rest[idx + from.len()..];
  }
  out.extend_from_slice(rest);
  out
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
  haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split on every occurrence of `sep`. An empty input yields a single empty chunk.
fn split<'a>(input: &'a [u8], sep: &[u8]) -> Vec<&'a [u8]> {
  let mut chunks = Vec::new();
  let mut rest = input;
  while let Some(idx) = find(rest, sep) {
    chunks.push(&rest[..idx]);
    rest = &rest[idx + sep.len()..];
  }
  chunks.push(rest);
  chunks
}

/* --------------------------------------- */
/// Trim unicode whitespace at both ends without assuming the whole body is valid UTF-8.
/// Bytes that do not decode to a character (e.g. binary file content) are never trimmed.
fn trim_whitespace(input: &[u8]) -> &[u8] {
  let mut start = 0;
  while let Some(len) = leading_space_len(&input[start..]) {
    start += len;
  }
  let mut end = input.len();
  while end > start {
    match trailing_space_len(&input[start..end]) {
      Some(len) => end -= len,
      None => break,
    }
  }
  &input[start..end]
}

fn leading_space_len(input: &[u8]) -> Option<usize> {
  let width = utf8_width(*input.first()?)?;
  let c = decode_char(input.get(..width)?)?;
  c.is_whitespace().then_some(width)
}

fn trailing_space_len(input: &[u8]) -> Option<usize> {
  // a utf-8 character is at most 4 bytes: walk back over continuation bytes
  let min_start = input.len().saturating_sub(4);
  let start = (min_start..input.len()).rev().find(|&i| input[i] & 0b1100_0000 != 0b1000_0000)?;
  let c = decode_char(&input[start..])?;
  c.is_whitespace().then_some(input.len() - start)
}

fn utf8_width(first: u8) -> Option<usize> {
  match first {
    0x00..=0x7f => Some(1),
    0xc0..=0xdf => Some(2),
    0xe0..=0xef => Some(3),
    0xf0..=0xf7 => Some(4),
    _ => None,
  }
}

/// Decode `bytes` as exactly one character
fn decode_char(bytes: &[u8]) -> Option<char> {
  let s = std::str::from_utf8(bytes).ok()?;
  let mut chars = s.chars();
  let c = chars.next()?;
  chars.next().is_none().then_some(c)
}

/* --------------------------------------- */
