//! # Transports
//!
//! The single external-call boundary of the crate.
//!
//! The invoker resolves an operation, validates the arguments and then hands a fully resolved
//! [`InvocationRequest`] to a [`Transport`]. How the call actually reaches the remote side (SOAP
//! over HTTP, an in-process stub, a mock) is entirely up to the implementation, and so are
//! timeouts, retries and connection reuse.
//!
//! * **[`soap::SoapHttpTransport`]**: the reference implementation, speaking SOAP 1.1/1.2 over HTTP.
use crate::BoxError;
use crate::model::OperationDescriptor;
use async_trait::async_trait;
use std::sync::Arc;

pub mod soap;

/// A resolved call: the operation descriptor plus its arguments bound in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub service: String,
    /// The endpoint declared by the description for `service`, if any.
    pub endpoint: Option<String>,
    pub operation: OperationDescriptor,
    /// `(parameter name, value)` pairs in the operation's positional order.
    pub arguments: Vec<(String, serde_json::Value)>,
}

impl InvocationRequest {
    pub fn argument(&self, name: &str) -> Option<&serde_json::Value> {
        self.arguments
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

/// Failures reported by a transport. The invoker surfaces them untouched.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("The remote call timed out")]
    Timeout,

    #[error("The remote call was cancelled")]
    Cancelled,

    #[error("Remote fault '{code}': {message}")]
    Fault { code: String, message: String },

    #[error("Unexpected HTTP status {status}: '{body}'")]
    Status { status: u16, body: String },

    #[error("No endpoint is known for service '{0}'")]
    MissingEndpoint(String),

    #[error("Failed to build the request: {0}")]
    InvalidRequest(String),

    #[error("Failed to send the request: '{0}'")]
    Request(#[source] BoxError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Performs remote calls on behalf of the invoker.
///
/// Implementations must be safe to share between concurrent invocations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform_call(
        &self,
        request: InvocationRequest,
    ) -> Result<serde_json::Value, TransportError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn perform_call(
        &self,
        request: InvocationRequest,
    ) -> Result<serde_json::Value, TransportError> {
        (**self).perform_call(request).await
    }
}
