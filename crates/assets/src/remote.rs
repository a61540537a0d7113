//! Blocking HTTP fetches for remote models. Runs on the loader worker.

use std::io::{ErrorKind, Read};
use std::time::Duration;

use base64::Engine;
use reqwest::blocking::Client;
use url::Url;

use crate::LoadError;

const TIMEOUT: Duration = Duration::from_secs(60);
const CHUNK_BYTES: usize = 64 * 1024;
// Content-Length is only a hint for the initial allocation.
const MAX_PREALLOC: u64 = 64 * 1024 * 1024;

pub(crate) fn default_client() -> Result<Client, LoadError> {
    Client::builder()
        .timeout(TIMEOUT)
        .user_agent(concat!("orbitview/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(LoadError::Client)
}

/// GET `url` into memory, reporting `(loaded, total)` after every chunk.
/// `total` comes from Content-Length when the server sends one.
pub(crate) fn fetch(
    client: &Client,
    url: &Url,
    mut on_progress: impl FnMut(u64, Option<u64>),
) -> Result<Vec<u8>, LoadError> {
    let mut response = client
        .get(url.clone())
        .send()
        .map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total = response.content_length();
    let mut bytes = Vec::with_capacity(total.unwrap_or(0).min(MAX_PREALLOC) as usize);
    let mut chunk = vec![0u8; CHUNK_BYTES];
    loop {
        let n = match response.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(LoadError::Body {
                    url: url.to_string(),
                    source,
                });
            }
        };
        bytes.extend_from_slice(&chunk[..n]);
        on_progress(bytes.len() as u64, total);
    }
    tracing::debug!(%url, bytes = bytes.len(), "fetched");
    Ok(bytes)
}

/// Resolve every buffer of a fetched document. Relative URIs are joined
/// onto `base`, the document's own URL.
pub(crate) fn fetch_buffers(
    client: &Client,
    document: &gltf::Document,
    base: &Url,
    mut blob: Option<Vec<u8>>,
) -> Result<Vec<Vec<u8>>, LoadError> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        let index = buffer.index();
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or(LoadError::MissingBlob { index })?,
            gltf::buffer::Source::Uri(uri) => match uri.strip_prefix("data:") {
                Some(rest) => decode_data_uri(index, rest)?,
                None => {
                    let url = base.join(uri).map_err(|source| LoadError::InvalidUrl {
                        location: uri.to_string(),
                        source,
                    })?;
                    fetch(client, &url, |_, _| {})?
                }
            },
        };
        if data.len() < buffer.length() {
            return Err(LoadError::BufferLength {
                index,
                expected: buffer.length(),
                actual: data.len(),
            });
        }
        while data.len() % 4 != 0 {
            data.push(0);
        }
        buffers.push(data);
    }
    Ok(buffers)
}

fn decode_data_uri(index: usize, rest: &str) -> Result<Vec<u8>, LoadError> {
    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or(LoadError::DataUri { index })?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|source| LoadError::Base64 { index, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_decodes() {
        let data = decode_data_uri(0, "application/octet-stream;base64,AQID").unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn data_uri_without_base64_marker_rejected() {
        let err = decode_data_uri(2, "text/plain,hello").unwrap_err();
        assert!(matches!(err, LoadError::DataUri { index: 2 }));
    }

    #[test]
    fn data_uri_with_bad_payload_rejected() {
        let err = decode_data_uri(1, "application/octet-stream;base64,@@@").unwrap_err();
        assert!(matches!(err, LoadError::Base64 { index: 1, .. }));
    }
}
