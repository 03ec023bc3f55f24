//! # Proxy State: Online
//!
//! This module defines the `DynamicProxy` behavior once a [`Transport`] is attached, which
//! unlocks [`DynamicProxy::invoke`].
use super::{DynamicProxy, Offline, Online};
use crate::registry::LookupError;
use crate::transport::{InvocationRequest, Transport, TransportError};
use crate::value::{self, Mismatch};
use crate::wsdl::ParseError;
use serde_json::Value;

/// Errors that can occur during a dynamic invocation.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    #[error("Operation '{operation}' not found in service '{service}'")]
    OperationNotFound { service: String, operation: String },

    #[error("Expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("Argument '{parameter}' expected {expected}, found {actual}")]
    TypeMismatch {
        /// Path to the offending value, starting with the parameter name.
        parameter: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to decode the result of '{operation}' as {expected}: {reason}")]
    ResultDecodeError {
        operation: String,
        expected: String,
        reason: String,
    },

    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),
}

impl From<LookupError> for InvokeError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::ServiceNotFound(service) => Self::ServiceNotFound(service),
            LookupError::OperationNotFound { service, operation } => {
                Self::OperationNotFound { service, operation }
            }
        }
    }
}

impl From<Mismatch> for InvokeError {
    fn from(err: Mismatch) -> Self {
        Self::TypeMismatch {
            parameter: err.path,
            expected: err.expected,
            actual: err.actual,
        }
    }
}

impl<T: Transport> DynamicProxy<Online<T>> {
    /// Parses `description` and attaches `transport` in one step.
    ///
    /// Equivalent to `DynamicProxy::offline(description)?.with_transport(transport)`.
    pub fn new(description: &[u8], transport: T) -> Result<Self, ParseError> {
        Ok(DynamicProxy::offline(description)?.with_transport(transport))
    }

    /// Detaches the transport, going back to the **Offline** state.
    pub fn into_offline(self) -> DynamicProxy<Offline> {
        DynamicProxy::new_with_state(Offline {
            registry: self.state.registry,
        })
    }

    pub fn transport(&self) -> &T {
        &self.state.transport
    }

    /// Invokes `operation` of `service` with positional arguments.
    ///
    /// The operation is resolved and every argument is checked against its declared type before
    /// anything reaches the transport. A call that passes validation reaches the transport
    /// exactly once, and its raw result is coerced into the declared return type.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The result, shaped after the operation's return type (`null` for void).
    /// * `Err(InvokeError)` - Lookup, validation, transport or decoding failures.
    pub async fn invoke(
        &self,
        service: &str,
        operation: &str,
        args: Vec<Value>,
    ) -> Result<Value, InvokeError> {
        let registry = &self.state.registry;
        let descriptor = registry.lookup_operation(service, operation)?;

        if args.len() != descriptor.parameters.len() {
            return Err(InvokeError::ArityMismatch {
                expected: descriptor.parameters.len(),
                got: args.len(),
            });
        }

        let mut arguments = Vec::with_capacity(args.len());
        for (param, arg) in descriptor.parameters.iter().zip(args) {
            value::check(&arg, &param.type_ref, param.optional, registry, &param.name)?;
            let arg = value::arrange(arg, &param.type_ref, registry);
            arguments.push((param.name.clone(), arg));
        }

        let request = InvocationRequest {
            service: service.to_string(),
            endpoint: registry.lookup_service(service)?.endpoint.clone(),
            operation: descriptor.clone(),
            arguments,
        };

        tracing::debug!(service, operation, "dispatching invocation");

        let raw = self.state.transport.perform_call(request).await?;

        value::coerce(raw, &descriptor.return_type, registry).map_err(|err| {
            InvokeError::ResultDecodeError {
                operation: operation.to_string(),
                expected: descriptor.return_type.to_string(),
                reason: err.to_string(),
            }
        })
    }
}
