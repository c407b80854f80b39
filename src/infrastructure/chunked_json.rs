// Chunked JSON streaming utilities
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

/// Create a chunked streaming response of length-prefixed JSON frames
pub async fn chunked_json_stream<S, T>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |msg| async move { serialize_chunk(&msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // Frames are compressed one by one, so no Content-Encoding on the response:
    // a client decoding the whole body would corrupt the frame boundaries
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson-framed")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize one message into a `u32` big-endian length + payload frame
pub async fn serialize_chunk<T: Serialize>(
    msg: &T,
    compress: bool,
) -> Result<Bytes, std::io::Error> {
    let buffer = serde_json::to_vec(msg).map_err(std::io::Error::other)?;

    let payload = if compress {
        brotli_compress(buffer).await?
    } else {
        buffer
    };

    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;
    use serde_json::{json, Value};

    fn split_frames(mut body: Bytes) -> Vec<Bytes> {
        let mut frames = Vec::new();
        while body.has_remaining() {
            let len = body.get_u32() as usize;
            frames.push(body.split_to(len));
        }
        frames
    }

    #[tokio::test]
    async fn test_frame_layout() {
        let chunk = serialize_chunk(&json!({"version": 3}), false).await.unwrap();

        assert_eq!(&chunk[..4], &[0, 0, 0, 13]);
        assert_eq!(&chunk[4..], br#"{"version":3}"#);
    }

    #[tokio::test]
    async fn test_stream_yields_one_frame_per_message() {
        let messages = futures::stream::iter(vec![json!({"version": 1}), json!({"version": 2})]);
        let response = chunked_json_stream(messages, false).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let frames: Vec<Value> = split_frames(body)
            .iter()
            .map(|f| serde_json::from_slice(f).unwrap())
            .collect();

        assert_eq!(frames, vec![json!({"version": 1}), json!({"version": 2})]);
    }

    #[tokio::test]
    async fn test_compressed_frames_are_smaller_for_repetitive_payloads() {
        let payload = json!({"names": vec!["Downtown Core"; 64]});
        let plain = serialize_chunk(&payload, false).await.unwrap();
        let compressed = serialize_chunk(&payload, true).await.unwrap();

        assert!(compressed.len() < plain.len());
    }
}
