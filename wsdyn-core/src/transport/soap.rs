//! # SOAP over HTTP
//!
//! The reference [`Transport`] implementation.
//!
//! ## How it works
//!
//! 1. The bound arguments are written into a SOAP envelope following the operation's binding
//!    style (see [`envelope`]).
//! 2. The envelope is posted to the service endpoint with the headers required by the SOAP
//!    version in use (`SOAPAction` for 1.1, the `action` media type parameter for 1.2).
//! 3. The response envelope is decoded back into a `serde_json::Value`. Leaf values come back as
//!    strings; turning them into the declared return type is the invoker's job.
//!
//! Faults are reported as [`TransportError::Fault`] whatever the HTTP status, and request
//! timeouts as [`TransportError::Timeout`].
use super::{InvocationRequest, Transport, TransportError};
use crate::model::SoapVersion;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub mod envelope;

#[derive(Debug, Clone, Default)]
pub struct SoapHttpTransport {
    client: reqwest::Client,
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl SoapHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuses an existing `reqwest` client (and its connection pool, proxies, TLS settings...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            ..Self::default()
        }
    }

    /// Sends every request to `endpoint` instead of the address declared by the description.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Fails calls that take longer than `timeout` with [`TransportError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(Box::new(err))
    }
}

#[async_trait]
impl Transport for SoapHttpTransport {
    async fn perform_call(
        &self,
        request: InvocationRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| request.endpoint.clone())
            .ok_or_else(|| TransportError::MissingEndpoint(request.service.clone()))?;

        let operation = &request.operation;
        let body = envelope::encode(operation, &request.arguments)?;
        let action = operation.soap_action.as_deref().unwrap_or_default();

        let mut builder = self.client.post(&endpoint).body(body);
        builder = match operation.soap_version {
            SoapVersion::Soap11 => builder
                .header(CONTENT_TYPE, "text/xml; charset=utf-8")
                .header("SOAPAction", format!("\"{action}\"")),
            SoapVersion::Soap12 if action.is_empty() => {
                builder.header(CONTENT_TYPE, "application/soap+xml; charset=utf-8")
            }
            SoapVersion::Soap12 => builder.header(
                CONTENT_TYPE,
                format!("application/soap+xml; charset=utf-8; action=\"{action}\""),
            ),
        };
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(
            endpoint = %endpoint,
            service = %request.service,
            operation = %operation.name,
            "sending SOAP request"
        );

        let response = builder.send().await.map_err(request_error)?;
        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        tracing::debug!(status = status.as_u16(), bytes = text.len(), "received SOAP response");

        envelope::decode(&text, status.as_u16(), operation)
    }
}
