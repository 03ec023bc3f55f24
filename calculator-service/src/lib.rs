//! # Calculator Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide service descriptions for
//! integration testing `wsdyn-core` and the `wsdyn` CLI tool.
//! It is not intended for production use.

/// A single `Calculator` service with one `Add(a: int, b: int) -> int` operation,
/// bound as `document/literal` wrapped over SOAP 1.1.
pub const CALCULATOR_WSDL: &[u8] = include_bytes!("../wsdl/calculator.wsdl");

/// Several services exercising complex types, arrays, `rpc` style, a SOAP 1.2 only port
/// and a service without operations.
pub const DIRECTORY_WSDL: &[u8] = include_bytes!("../wsdl/directory.wsdl");

/// The `targetNamespace` shared by both descriptions.
pub const NAMESPACE: &str = "http://tempuri.org/";
