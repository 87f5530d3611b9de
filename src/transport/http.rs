//! HTTP backend for the docs chat service.
//!
//! Two endpoints:
//! - `POST {session_url}` (no body) answers `{"sessionId": "..."}`
//! - `POST {chat_url}` with `{"message", "sessionId"}` answers a byte stream
//!   of JSON records (see [`StreamRecord`](super::StreamRecord))

use std::fmt;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc::Sender;

use super::backend::{ChatBackend, ChatRequest, SessionError, TransportError};
use super::decoder::RecordDecoder;
use super::types::{ChatRequestBody, StreamEvent, session_id_from};

pub struct HttpBackend {
    session_url: String,
    chat_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(session_url: impl Into<String>, chat_url: impl Into<String>) -> Self {
        Self {
            session_url: session_url.into(),
            chat_url: chat_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

/// Reads `stream` until it is exhausted, decoding records and sending the
/// resulting events to `sender` strictly in arrival order.
pub async fn consume_stream<S, B, E>(
    stream: S,
    sender: &Sender<StreamEvent>,
) -> Result<(), TransportError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
{
    futures::pin_mut!(stream);

    let mut decoder = RecordDecoder::new();
    let mut chunk_count = 0usize;
    let mut total_content_len = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
        let bytes = chunk.as_ref();
        chunk_count += 1;
        debug!("Raw chunk received: {} bytes", bytes.len());

        for record in decoder.push(bytes)? {
            let Some(event) = record.into_event() else {
                debug!("Skipping record with nothing to fold");
                continue;
            };
            if let StreamEvent::Content(text) = &event {
                total_content_len += text.len();
            }
            if sender.send(event).await.is_err() {
                warn!("Stream event send failed: receiver dropped");
                return Err(TransportError::ChannelClosed);
            }
        }
    }

    decoder.finish()?;
    info!(
        "Stream ended: {} chunks, {} total content bytes",
        chunk_count, total_content_len
    );
    Ok(())
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn create_session(&self) -> Result<String, SessionError> {
        info!("Creating chat session at {}", self.session_url);

        let response = self
            .client
            .post(self.session_url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| SessionError::Unexpected(e.to_string()))?;

        debug!("Session response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Session endpoint returned HTTP {}", status);
            return Err(SessionError::Unexpected(format!("HTTP {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SessionError::Unexpected(e.to_string()))?;

        session_id_from(&body).ok_or_else(|| {
            warn!("Session response carried no usable session id: {}", body);
            SessionError::CreationFailed
        })
    }

    async fn stream_reply(
        &self,
        request: ChatRequest<'_>,
        sender: Sender<StreamEvent>,
    ) -> Result<(), TransportError> {
        let body = ChatRequestBody {
            message: request.message,
            session_id: request.session_id,
        };

        info!(
            "Chat request: session={}, message_len={}",
            request.session_id,
            request.message.len()
        );

        let response = self
            .client
            .post(self.chat_url.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat API error: {} - {}", status, err_body);
            return Err(TransportError::Api {
                status,
                message: err_body,
            });
        }

        consume_stream(response.bytes_stream(), &sender).await
    }
}
