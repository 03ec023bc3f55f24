//! # Service Model
//!
//! The in-memory representation of a parsed service description.
//!
//! Everything in here is plain data: the model is built once by [`crate::wsdl::parse`],
//! handed to a [`crate::Registry`] and never mutated afterwards. Types are described by
//! [`TypeRef`] tags instead of compiled representations, which is all the invoker needs to
//! validate arguments and coerce results.
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The fully parsed service description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceModel {
    /// The `targetNamespace` of the `wsdl:definitions` element, if any.
    pub target_namespace: Option<String>,
    /// Declared services, in document order.
    pub services: Vec<ServiceDescriptor>,
    /// Named complex types referenced by [`TypeRef::Complex`], in document order.
    pub types: Vec<ComplexType>,
}

impl ServiceModel {
    /// Builds a name index over [`ServiceModel::types`].
    pub(crate) fn type_index(&self) -> HashMap<String, usize> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (ty.name.clone(), idx))
            .collect()
    }
}

/// One remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: String,
    /// The address of the selected SOAP port (`soap:address/@location`).
    pub endpoint: Option<String>,
    /// Operations explicitly declared for this service, in declaration order.
    pub operations: Vec<OperationDescriptor>,
}

/// One callable remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    pub name: String,
    /// Positional parameters. Order is call-significant.
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeRef,
    /// Value of the `SOAPAction` header for this operation.
    pub soap_action: Option<String>,
    pub style: BindingStyle,
    pub soap_version: SoapVersion,
    /// Namespace the request body element is qualified with.
    pub namespace: Option<String>,
    /// Local name of the request body element.
    pub request_element: String,
    /// Whether parameter elements are qualified with [`OperationDescriptor::namespace`].
    pub qualified_parameters: bool,
    /// Local name of the response child holding the result (the single child of a wrapped
    /// response, or the first output part of an rpc response).
    ///
    /// `None` when the response body element is the result itself.
    pub result_element: Option<String>,
}

/// A named, typed slot: an operation parameter or a complex type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_ref: TypeRef,
    /// `true` when the value may be omitted or `null` (`minOccurs="0"` or `nillable="true"`).
    pub optional: bool,
}

/// A named structural type declared in the description's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexType {
    pub name: String,
    pub fields: Vec<ParameterDescriptor>,
}

impl ComplexType {
    pub fn field(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// How an operation lays out its messages on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BindingStyle {
    /// `document/literal` with a single wrapper element named after the operation.
    DocumentWrapped,
    /// `document/literal` where every message part is its own body element.
    DocumentBare,
    /// `rpc` style: parts are children of an element named after the operation.
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoapVersion {
    Soap11,
    Soap12,
}

/// A semantic type tag, sufficient to validate and coerce values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    /// No value, used for operations without a result.
    Void,
    Primitive(PrimitiveKind),
    /// A reference to an entry of [`ServiceModel::types`].
    Complex(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(kind) => f.write_str(kind.as_str()),
            TypeRef::Complex(name) => f.write_str(name),
            TypeRef::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

/// The primitive kinds XML Schema built-in types are folded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    DateTime,
    Date,
    Time,
    Base64Binary,
    AnyType,
}

impl PrimitiveKind {
    /// Maps the local name of an XML Schema built-in type onto a primitive kind.
    ///
    /// Built-ins without a dedicated kind degrade to [`PrimitiveKind::AnyType`].
    pub fn from_xsd(local_name: &str) -> Self {
        match local_name {
            "string" | "normalizedString" | "token" | "anyURI" | "QName" | "NCName" | "Name"
            | "ID" | "IDREF" | "language" | "NMTOKEN" | "duration" | "hexBinary" => {
                PrimitiveKind::String
            }
            "boolean" => PrimitiveKind::Boolean,
            "int" | "short" | "byte" | "unsignedShort" | "unsignedByte" => PrimitiveKind::Int,
            "long" | "integer" | "unsignedInt" | "unsignedLong" | "nonNegativeInteger"
            | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            "decimal" => PrimitiveKind::Decimal,
            "dateTime" => PrimitiveKind::DateTime,
            "date" => PrimitiveKind::Date,
            "time" => PrimitiveKind::Time,
            "base64Binary" => PrimitiveKind::Base64Binary,
            _ => PrimitiveKind::AnyType,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::DateTime => "dateTime",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Time => "time",
            PrimitiveKind::Base64Binary => "base64Binary",
            PrimitiveKind::AnyType => "anyType",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
