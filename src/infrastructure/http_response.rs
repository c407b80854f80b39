// HTTP response utilities for JSON+Brotli encoding
use async_compression::tokio::bufread::BrotliEncoder;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Response, StatusCode},
};
use serde::Serialize;
use tokio::io::AsyncReadExt;

/// Whether the client advertised Brotli in `Accept-Encoding`
pub fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').any(|enc| enc.trim().starts_with("br")))
        .unwrap_or(false)
}

pub async fn brotli_compress(bytes: Vec<u8>) -> std::io::Result<Vec<u8>> {
    let mut encoder = BrotliEncoder::new(std::io::Cursor::new(bytes));
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed).await?;
    Ok(compressed)
}

/// Serialize a value to JSON with optional Brotli compression
pub async fn json_response<T: Serialize>(
    data: &T,
    status: StatusCode,
    compress: bool,
) -> Result<Response<Body>, StatusCode> {
    let json_bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (body_bytes, content_encoding) = if compress {
        let original_len = json_bytes.len();
        let compressed = brotli_compress(json_bytes).await.map_err(|e| {
            tracing::error!("Brotli compression error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        tracing::trace!("Compressed {} -> {} bytes", original_len, compressed.len());
        (compressed, Some("br"))
    } else {
        (json_bytes, None)
    };

    let mut response_builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, HeaderValue::from(body_bytes.len()));

    if let Some(encoding) = content_encoding {
        response_builder = response_builder.header(header::CONTENT_ENCODING, encoding);
    }

    response_builder
        .body(Body::from(body_bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;
    use serde_json::json;

    #[test]
    fn test_accepts_brotli() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_brotli(&headers));

        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
        assert!(accepts_brotli(&headers));

        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        assert!(!accepts_brotli(&headers));
    }

    #[tokio::test]
    async fn test_plain_json_response() {
        let response = json_response(&json!({"ok": true}), StatusCode::OK, false).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_compressed_json_response() {
        let payload = json!({"geofences": ["geo1", "geo2", "geo3", "geo4"]});
        let response = json_response(&payload, StatusCode::CREATED, true).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut decoder = BrotliDecoder::new(&body[..]);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).await.unwrap();

        let decoded: serde_json::Value = serde_json::from_slice(&decompressed).unwrap();
        assert_eq!(decoded, payload);
    }
}
