//! # WSDL Parsing
//!
//! This module turns the raw bytes of a WSDL 1.1 document into a [`ServiceModel`].
//!
//! Parsing happens in two stages:
//!
//! 1. **[`document`]**: checks that the input is well-formed XML and builds a small,
//!    namespace-aware element tree out of `quick-xml` events.
//! 2. **[`parser`]**: interprets that tree as a WSDL description (schema types, messages,
//!    port types, SOAP bindings and services) and flattens it into the model.
//!
//! No code is generated and nothing is persisted; the model is the only output.
use crate::model::ServiceModel;

pub mod document;
mod parser;

/// Errors that abort the construction of a proxy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Unsupported service description: {0}")]
    UnsupportedDescription(String),
}

/// Parses a WSDL document into a [`ServiceModel`].
///
/// # Returns
///
/// * `Ok(ServiceModel)` - The flattened description.
/// * `Err(ParseError::MalformedDocument)` - The input is not well-formed XML.
/// * `Err(ParseError::UnsupportedDescription)` - The input is XML, but not a self-contained
///   WSDL 1.1 description this crate can interpret.
pub fn parse(bytes: &[u8]) -> Result<ServiceModel, ParseError> {
    let root = document::parse(bytes)?;
    let model = parser::build_model(&root)?;

    tracing::debug!(
        services = model.services.len(),
        types = model.types.len(),
        "parsed service description"
    );

    Ok(model)
}
