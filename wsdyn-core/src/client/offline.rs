//! # Proxy State: Offline
//!
//! This module defines the `DynamicProxy` behavior when it holds an indexed description but no
//! transport, along with the introspection operations every state shares.
use super::{DescriptionState, DynamicProxy, Offline, Online};
use crate::model::{ComplexType, ServiceDescriptor};
use crate::registry::{LookupError, OperationSignature, Registry};
use crate::transport::Transport;
use crate::wsdl::{self, ParseError};

impl DynamicProxy<Offline> {
    /// Creates a new `DynamicProxy` in the Offline state from the bytes of a WSDL document.
    ///
    /// # Arguments
    ///
    /// * `description` - The raw service description.
    ///
    /// # Returns
    ///
    /// * `Ok(DynamicProxy<Offline>)` - The fully indexed proxy.
    /// * `Err(ParseError)` - If the bytes are not a supported description.
    pub fn offline(description: &[u8]) -> Result<Self, ParseError> {
        let model = wsdl::parse(description)?;
        Ok(Self::new_with_state(Offline {
            registry: Registry::new(model),
        }))
    }

    /// Transitions to the **Online** state by attaching a transport.
    pub fn with_transport<T: Transport>(self, transport: T) -> DynamicProxy<Online<T>> {
        DynamicProxy::new_with_state(Online {
            registry: self.state.registry,
            transport,
        })
    }
}

impl<S> DynamicProxy<S>
where
    S: DescriptionState,
{
    pub fn registry(&self) -> &Registry {
        self.state.registry()
    }

    /// Lists all services of the description, in document order.
    pub fn list_services(&self) -> Vec<String> {
        self.registry().list_services()
    }

    /// Lists the operations declared by `service`, in declaration order.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The operation names. May be empty.
    /// * `Err(LookupError::ServiceNotFound)` - If the service does not exist.
    pub fn list_operations(&self, service: &str) -> Result<Vec<String>, LookupError> {
        self.registry().list_operations(service)
    }

    /// Returns the ordered parameters and the return type of an operation.
    pub fn describe_operation(
        &self,
        service: &str,
        operation: &str,
    ) -> Result<OperationSignature, LookupError> {
        self.registry().describe_operation(service, operation)
    }

    pub fn service(&self, service: &str) -> Result<&ServiceDescriptor, LookupError> {
        self.registry().lookup_service(service)
    }

    /// Looks up a complex type referenced by a [`crate::TypeRef::Complex`].
    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.registry().complex_type(name)
    }
}
