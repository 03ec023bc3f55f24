//! # Service Registry
//!
//! Read-only indexes over a [`ServiceModel`].
//!
//! The registry owns the model it was built from and never mutates it, so it can be shared
//! between any number of concurrent readers without locking. Only operations explicitly
//! declared by the description are ever listed: the model has no notion of inherited
//! infrastructure members to begin with.
use crate::model::{
    ComplexType, OperationDescriptor, ParameterDescriptor, ServiceDescriptor, ServiceModel,
    TypeRef,
};
use std::collections::HashMap;

/// Errors that can occur when looking up a service or an operation by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    #[error("Operation '{operation}' not found in service '{service}'")]
    OperationNotFound { service: String, operation: String },
}

/// The ordered parameters and the return type of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSignature {
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
}

impl OperationSignature {
    /// `(name, type)` pairs in declaration order.
    pub fn parameter_types(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.parameters
            .iter()
            .map(|param| (param.name.as_str(), &param.type_ref))
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    model: ServiceModel,
    services: HashMap<String, usize>,
    types: HashMap<String, usize>,
}

impl Registry {
    /// Indexes a model produced by [`crate::wsdl::parse`], which guarantees unique service names.
    pub(crate) fn new(model: ServiceModel) -> Self {
        let services = model
            .services
            .iter()
            .enumerate()
            .map(|(idx, service)| (service.name.clone(), idx))
            .collect();
        let types = model.type_index();

        Self {
            model,
            services,
            types,
        }
    }

    pub fn model(&self) -> &ServiceModel {
        &self.model
    }

    /// All service names, in document order.
    pub fn list_services(&self) -> Vec<String> {
        self.model
            .services
            .iter()
            .map(|service| service.name.clone())
            .collect()
    }

    pub fn lookup_service(&self, name: &str) -> Result<&ServiceDescriptor, LookupError> {
        self.services
            .get(name)
            .map(|idx| &self.model.services[*idx])
            .ok_or_else(|| LookupError::ServiceNotFound(name.to_string()))
    }

    /// Names of the operations declared by `service`, in declaration order.
    pub fn list_operations(&self, service: &str) -> Result<Vec<String>, LookupError> {
        let service = self.lookup_service(service)?;
        Ok(service.operations.iter().map(|op| op.name.clone()).collect())
    }

    /// Looks up an operation by exact, case-sensitive name.
    pub fn lookup_operation(
        &self,
        service: &str,
        operation: &str,
    ) -> Result<&OperationDescriptor, LookupError> {
        self.lookup_service(service)?
            .operations
            .iter()
            .find(|op| op.name == operation)
            .ok_or_else(|| LookupError::OperationNotFound {
                service: service.to_string(),
                operation: operation.to_string(),
            })
    }

    pub fn describe_operation(
        &self,
        service: &str,
        operation: &str,
    ) -> Result<OperationSignature, LookupError> {
        let operation = self.lookup_operation(service, operation)?;
        Ok(OperationSignature {
            parameters: operation.parameters.clone(),
            return_type: operation.return_type.clone(),
        })
    }

    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.types.get(name).map(|idx| &self.model.types[*idx])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{BindingStyle, PrimitiveKind, SoapVersion};

    fn operation(name: &str, params: &[&str]) -> OperationDescriptor {
        OperationDescriptor {
            name: name.to_string(),
            parameters: params
                .iter()
                .map(|param| ParameterDescriptor {
                    name: param.to_string(),
                    type_ref: TypeRef::Primitive(PrimitiveKind::Int),
                    optional: false,
                })
                .collect(),
            return_type: TypeRef::Primitive(PrimitiveKind::Int),
            soap_action: None,
            style: BindingStyle::DocumentWrapped,
            soap_version: SoapVersion::Soap11,
            namespace: None,
            request_element: name.to_string(),
            qualified_parameters: false,
            result_element: None,
        }
    }

    fn registry() -> Registry {
        Registry::new(ServiceModel {
            target_namespace: None,
            services: vec![
                ServiceDescriptor {
                    name: "Calculator".to_string(),
                    endpoint: None,
                    operations: vec![operation("Add", &["a", "b"]), operation("Negate", &["x"])],
                },
                ServiceDescriptor {
                    name: "Idle".to_string(),
                    endpoint: None,
                    operations: vec![],
                },
            ],
            types: vec![],
        })
    }

    #[test]
    fn test_lists_in_declaration_order() {
        let registry = registry();
        assert_eq!(registry.list_services(), vec!["Calculator", "Idle"]);
        assert_eq!(
            registry.list_operations("Calculator").unwrap(),
            vec!["Add", "Negate"]
        );
        assert!(registry.list_operations("Idle").unwrap().is_empty());
    }

    #[test]
    fn test_describe_keeps_parameter_order() {
        let registry = registry();
        let signature = registry.describe_operation("Calculator", "Add").unwrap();
        let names: Vec<_> = signature.parameter_types().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = registry();
        assert_eq!(
            registry.lookup_service("calculator").unwrap_err(),
            LookupError::ServiceNotFound("calculator".to_string())
        );
        assert_eq!(
            registry.lookup_operation("Idle", "Add").unwrap_err(),
            LookupError::OperationNotFound {
                service: "Idle".to_string(),
                operation: "Add".to_string(),
            }
        );
        assert!(registry.complex_type("Point").is_none());
    }
}
