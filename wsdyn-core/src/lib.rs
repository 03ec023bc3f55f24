//! # Wsdyn Core
//!
//! `wsdyn-core` is the foundational library powering the Wsdyn CLI. It provides a dynamic
//! SOAP client capable of calling any operation described by a WSDL document without
//! generating or compiling any operation-specific code.
//!
//! ## Key Components
//!
//! * **[`DynamicProxy`]:** The main entry point. It parses a service description once, indexes it
//!   and dispatches invocations by name to a pluggable [`Transport`].
//! * **[`wsdl`]:** Turns WSDL 1.1 bytes into an immutable [`ServiceModel`].
//! * **[`Registry`]:** Read-only lookups of services, operations and their signatures.
//! * **[`value`]:** Checks arguments against a [`TypeRef`] and coerces raw transport results back
//!   into the declared return type. Values are plain `serde_json::Value`s.
//!
//! ## Transports
//!
//! The core never talks to the network itself. Every call goes through the [`Transport`] trait,
//! which receives a fully resolved [`InvocationRequest`].
//!
//! * **[`SoapHttpTransport`]:** A reference implementation that speaks SOAP 1.1/1.2 over HTTP
//!   using `reqwest`.
//!
//! ## Re-exports
//!
//! This crate re-exports `serde_json` so that callers build arguments with the same version
//! the invoker checks them with.
//!
//! See the README.md for more details about usage.
pub mod client;
pub mod model;
pub mod registry;
pub mod transport;
pub mod value;
pub mod wsdl;

pub use client::{DynamicProxy, InvokeError};
pub use model::{
    BindingStyle, ComplexType, OperationDescriptor, ParameterDescriptor, PrimitiveKind,
    ServiceDescriptor, ServiceModel, SoapVersion, TypeRef,
};
pub use registry::{LookupError, OperationSignature, Registry};
pub use transport::{InvocationRequest, Transport, TransportError, soap::SoapHttpTransport};
pub use wsdl::ParseError;

// Re-exports
pub use serde_json;

/// Type alias for the standard boxed error used in generic bounds.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
