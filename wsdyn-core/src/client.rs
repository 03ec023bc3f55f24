//! # Dynamic Proxy
//!
//! This module implements the high-level entry point of the crate.
//!
//! The [`DynamicProxy`] uses a **Typestate Pattern** to tell apart what a proxy can do:
//!
//! 1. **[`Offline`]**: The description has been parsed and indexed, but no transport is
//!    attached. The proxy can only be used for introspection (listing services and operations,
//!    describing operations).
//! 2. **[`Online`]**: A [`crate::Transport`] is attached, so operations can also be invoked.
//!
//! Construction is atomic in both states: either the description is fully parsed and indexed
//! and a proxy is returned, or a [`crate::ParseError`] is returned and no proxy exists. A
//! proxy never changes afterwards; parsing another description requires another proxy.
//!
//! ## Example: State Transition
//!
//! ```rust,no_run
//! use wsdyn_core::{DynamicProxy, SoapHttpTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("calculator.wsdl")?;
//!
//! // 1. Offline State (introspection only)
//! let proxy = DynamicProxy::offline(&bytes)?;
//! println!("{:?}", proxy.list_services());
//!
//! // 2. Online State (introspection + invocation)
//! let proxy = proxy.with_transport(SoapHttpTransport::new());
//! let sum = proxy
//!     .invoke("Calculator", "Add", vec![2.into(), 3.into()])
//!     .await?;
//! # Ok(())
//! # }
//! ```
pub mod offline;
pub mod online;

pub use online::InvokeError;

use crate::registry::Registry;

/// A dynamic client for the services of one service description.
///
/// The generic parameter `T` represents the current state of the proxy.
#[derive(Debug, Clone)]
pub struct DynamicProxy<T> {
    state: T,
}

impl<T> DynamicProxy<T> {
    pub(crate) fn new_with_state(state: T) -> Self {
        Self { state }
    }
}

/// State: description indexed, no transport.
#[derive(Debug, Clone)]
pub struct Offline {
    registry: Registry,
}

/// State: description indexed, transport attached.
#[derive(Debug, Clone)]
pub struct Online<T> {
    registry: Registry,
    transport: T,
}

/// Implemented by every state that carries an indexed description.
pub trait DescriptionState {
    fn registry(&self) -> &Registry;
}

impl DescriptionState for Offline {
    fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl<T> DescriptionState for Online<T> {
    fn registry(&self) -> &Registry {
        &self.registry
    }
}
