//! WSDL 1.1 interpretation.
//!
//! Walks the element tree produced by [`super::document`] and flattens it into a
//! [`ServiceModel`]: every `wsdl:service` becomes a [`ServiceDescriptor`] whose operations are
//! taken from its SOAP port, through the port's binding, down to the port type and its messages.
use super::ParseError;
use super::document::{Element, QName};
use crate::model::{
    BindingStyle, ComplexType, OperationDescriptor, ParameterDescriptor, PrimitiveKind,
    ServiceDescriptor, ServiceModel, SoapVersion, TypeRef,
};
use std::collections::{HashMap, HashSet};

const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
const SOAP11_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const SOAP12_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";

const MAX_SIMPLE_TYPE_DEPTH: usize = 32;

fn unsupported(message: impl Into<String>) -> ParseError {
    ParseError::UnsupportedDescription(message.into())
}

/// A top-level schema component together with the schema it was declared in.
#[derive(Clone, Copy)]
struct SchemaItem<'a> {
    node: &'a Element,
    qualified: bool,
}

#[derive(Default)]
struct Schemas<'a> {
    elements: HashMap<QName, SchemaItem<'a>>,
    complex_types: HashMap<QName, SchemaItem<'a>>,
    simple_types: HashMap<QName, SchemaItem<'a>>,
    /// Named complex types in document order, so the model lists them the same way.
    complex_order: Vec<QName>,
}

impl<'a> Schemas<'a> {
    fn collect(definitions: &'a Element) -> Result<Self, ParseError> {
        let mut schemas = Schemas::default();

        for types in definitions.children_named(WSDL_NS, "types") {
            for schema in types.children_named(XSD_NS, "schema") {
                schemas.add_schema(schema)?;
            }
        }

        Ok(schemas)
    }

    fn add_schema(&mut self, schema: &'a Element) -> Result<(), ParseError> {
        let namespace = schema.attr("targetNamespace");
        let qualified = schema.attr("elementFormDefault") == Some("qualified");

        for node in &schema.children {
            if node.namespace.as_deref() != Some(XSD_NS) {
                continue;
            }

            let item = SchemaItem { node, qualified };

            match node.local_name.as_str() {
                "import" => {
                    if let Some(location) = node.attr("schemaLocation") {
                        return Err(unsupported(format!(
                            "schema import of '{location}' requires an external document"
                        )));
                    }
                }
                "include" | "redefine" => {
                    let location = node.attr("schemaLocation").unwrap_or_default();
                    return Err(unsupported(format!(
                        "schema {} of '{location}' requires an external document",
                        node.local_name
                    )));
                }
                "element" => {
                    let name = required_attr(node, "name")?;
                    self.elements.insert(QName::new(namespace, name), item);
                }
                "complexType" => {
                    let name = QName::new(namespace, required_attr(node, "name")?);
                    if self.complex_types.insert(name.clone(), item).is_none() {
                        self.complex_order.push(name);
                    }
                }
                "simpleType" => {
                    let name = required_attr(node, "name")?;
                    self.simple_types.insert(QName::new(namespace, name), item);
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn required_attr<'e>(node: &'e Element, name: &str) -> Result<&'e str, ParseError> {
    node.attr(name).ok_or_else(|| {
        unsupported(format!(
            "'{}' element is missing its '{name}' attribute",
            node.local_name
        ))
    })
}

fn qname_attr(node: &Element, name: &str) -> Result<Option<QName>, ParseError> {
    node.attr(name)
        .map(|value| {
            node.resolve_qname(value).ok_or_else(|| {
                unsupported(format!("prefix of '{value}' is not bound to a namespace"))
            })
        })
        .transpose()
}

fn required_qname_attr(node: &Element, name: &str) -> Result<QName, ParseError> {
    qname_attr(node, name)?.ok_or_else(|| {
        unsupported(format!(
            "'{}' element is missing its '{name}' attribute",
            node.local_name
        ))
    })
}

/// Occurrence constraints of a particle (`minOccurs`, `maxOccurs`, `nillable`).
fn occurrence(node: &Element) -> (bool, bool) {
    let optional = node.attr("minOccurs") == Some("0") || node.attr("nillable") == Some("true");
    let repeated = match node.attr("maxOccurs") {
        Some("unbounded") => true,
        Some(max) => max.parse::<u64>().map(|max| max > 1).unwrap_or(false),
        None => false,
    };
    (optional, repeated)
}

/// Identity of a complex type: its qualified name, or the inline declaration itself.
#[derive(Clone, PartialEq, Eq, Hash)]
enum TypeKey {
    Named(QName),
    Anonymous(*const Element),
}

/// Converts schema components into [`TypeRef`]s, registering complex types on the way.
struct TypeResolver<'s, 'a> {
    schemas: &'s Schemas<'a>,
    types: Vec<ComplexType>,
    slots: HashMap<String, usize>,
    /// Resolved `TypeRef` per complex type (simple content types resolve to primitives).
    resolved: HashMap<TypeKey, TypeRef>,
    /// Local names of the named complex types. Anonymous types never take these.
    reserved: HashSet<String>,
    /// Named types whose resolution has started but not finished.
    in_progress: HashSet<QName>,
    /// Model names of the complex types whose content is being collected, innermost last.
    enclosing: Vec<String>,
}

impl<'s, 'a> TypeResolver<'s, 'a> {
    fn new(schemas: &'s Schemas<'a>) -> Result<Self, ParseError> {
        let mut reserved = HashSet::new();
        for name in &schemas.complex_order {
            if !reserved.insert(name.local.clone()) {
                return Err(unsupported(format!(
                    "complex type '{}' is declared in several namespaces",
                    name.local
                )));
            }
        }

        Ok(Self {
            schemas,
            types: Vec::new(),
            slots: HashMap::new(),
            resolved: HashMap::new(),
            reserved,
            in_progress: HashSet::new(),
            enclosing: Vec::new(),
        })
    }

    /// Picks the model name of an anonymous type declared by element `element`.
    ///
    /// The element name is used when free, then the name qualified by the enclosing type
    /// (e.g. `Invoice.item`), then a numbered variant of it.
    fn anonymous_name(&self, element: &str) -> String {
        let taken = |name: &str| self.slots.contains_key(name) || self.reserved.contains(name);
        if !taken(element) {
            return element.to_string();
        }

        let base = match self.enclosing.last() {
            Some(parent) => format!("{parent}.{element}"),
            None => element.to_string(),
        };
        if !taken(&base) {
            return base;
        }

        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|name| !taken(name))
            .unwrap_or(base)
    }

    fn resolve_all(&mut self) -> Result<(), ParseError> {
        let schemas = self.schemas;
        for name in &schemas.complex_order {
            self.resolve_type(name)?;
        }
        Ok(())
    }

    /// Resolves a type name (`type="..."`, `base="..."`) to a [`TypeRef`].
    fn resolve_type(&mut self, name: &QName) -> Result<TypeRef, ParseError> {
        match name.namespace.as_deref() {
            Some(XSD_NS) | Some(SOAP_ENCODING_NS) => {
                return Ok(TypeRef::Primitive(PrimitiveKind::from_xsd(&name.local)));
            }
            _ => {}
        }

        let key = TypeKey::Named(name.clone());
        if let Some(resolved) = self.resolved.get(&key) {
            return Ok(resolved.clone());
        }

        if !self.in_progress.insert(name.clone()) {
            return Err(unsupported(format!("type '{name}' is derived from itself")));
        }

        let resolved = if let Some(item) = self.schemas.complex_types.get(name).copied() {
            self.resolve_complex(key, name.local.clone(), item.node)
        } else if let Some(item) = self.schemas.simple_types.get(name).copied() {
            self.resolve_simple(item.node, 0)
        } else {
            Err(unsupported(format!("type '{name}' is not defined")))
        };

        self.in_progress.remove(name);
        resolved
    }

    fn resolve_simple(&mut self, node: &Element, depth: usize) -> Result<TypeRef, ParseError> {
        if depth > MAX_SIMPLE_TYPE_DEPTH {
            return Err(unsupported("simple type derivation is too deep or cyclic"));
        }

        let Some(restriction) = node.child(XSD_NS, "restriction") else {
            // Lists and unions travel as plain text.
            return Ok(TypeRef::Primitive(PrimitiveKind::String));
        };

        match qname_attr(restriction, "base")? {
            Some(base) if base.namespace.as_deref() == Some(XSD_NS) => {
                Ok(TypeRef::Primitive(PrimitiveKind::from_xsd(&base.local)))
            }
            Some(base) => match self.schemas.simple_types.get(&base).copied() {
                Some(item) => self.resolve_simple(item.node, depth + 1),
                None => self.resolve_type(&base),
            },
            None => match restriction.child(XSD_NS, "simpleType") {
                Some(inline) => self.resolve_simple(inline, depth + 1),
                None => Ok(TypeRef::Primitive(PrimitiveKind::String)),
            },
        }
    }

    /// Registers a complex type under `model_name` and converts its content model into fields.
    fn resolve_complex(
        &mut self,
        key: TypeKey,
        model_name: String,
        node: &Element,
    ) -> Result<TypeRef, ParseError> {
        if let Some(simple) = node.child(XSD_NS, "simpleContent") {
            let base = simple
                .children
                .iter()
                .find_map(|derivation| qname_attr(derivation, "base").transpose())
                .transpose()?;
            let type_ref = match base {
                Some(base) => self.resolve_type(&base)?,
                None => TypeRef::Primitive(PrimitiveKind::String),
            };
            self.resolved.insert(key, type_ref.clone());
            return Ok(type_ref);
        }

        let type_ref = TypeRef::Complex(model_name.clone());

        // Reserve the slot first so self-referencing types terminate.
        let slot = self.types.len();
        self.types.push(ComplexType {
            name: model_name.clone(),
            fields: Vec::new(),
        });
        self.slots.insert(model_name.clone(), slot);
        self.resolved.insert(key, type_ref.clone());

        self.enclosing.push(model_name);
        let mut fields = Vec::new();
        let collected = self.collect_content(node, &mut fields, false);
        self.enclosing.pop();
        collected?;
        self.types[slot].fields = fields;

        Ok(type_ref)
    }

    /// Collects the element particles of a content model, in order.
    fn collect_content(
        &mut self,
        node: &Element,
        fields: &mut Vec<ParameterDescriptor>,
        force_optional: bool,
    ) -> Result<(), ParseError> {
        for child in &node.children {
            if child.namespace.as_deref() != Some(XSD_NS) {
                continue;
            }

            match child.local_name.as_str() {
                "sequence" | "all" => {
                    let (optional, _) = occurrence(child);
                    self.collect_content(child, fields, force_optional || optional)?;
                }
                "choice" => self.collect_content(child, fields, true)?,
                "complexContent" => {
                    for derivation in &child.children {
                        if let Some(base) = qname_attr(derivation, "base")? {
                            self.collect_base(&base, fields)?;
                        }
                        self.collect_content(derivation, fields, force_optional)?;
                    }
                }
                "element" => {
                    let mut field = self.particle(child)?;
                    field.optional |= force_optional;
                    fields.push(field);
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn collect_base(
        &mut self,
        base: &QName,
        fields: &mut Vec<ParameterDescriptor>,
    ) -> Result<(), ParseError> {
        self.check_derivation(base)?;

        if let TypeRef::Complex(name) = self.resolve_type(base)? {
            let slot = self.slots[&name];
            fields.extend(self.types[slot].fields.iter().cloned());
        }
        Ok(())
    }

    /// Fails when the derivation chain starting at `base` loops back on itself.
    fn check_derivation(&self, base: &QName) -> Result<(), ParseError> {
        let mut seen = HashSet::new();
        let mut current = Some(base.clone());

        while let Some(name) = current {
            let Some(item) = self.schemas.complex_types.get(&name) else {
                break;
            };
            current = derivation_base(item.node)?;
            if !seen.insert(name) {
                return Err(unsupported(format!(
                    "type '{base}' is derived from itself"
                )));
            }
        }

        Ok(())
    }

    /// Converts a local `xsd:element` particle into a field.
    fn particle(&mut self, node: &Element) -> Result<ParameterDescriptor, ParseError> {
        let (optional, repeated) = occurrence(node);

        let (name, type_ref) = match qname_attr(node, "ref")? {
            Some(reference) => {
                let type_ref = self.resolve_element(&reference)?;
                (reference.local, type_ref)
            }
            None => {
                let name = required_attr(node, "name")?;
                (name.to_string(), self.element_type(node, name)?)
            }
        };

        let type_ref = if repeated {
            TypeRef::Array(Box::new(type_ref))
        } else {
            type_ref
        };

        Ok(ParameterDescriptor {
            name,
            type_ref,
            optional,
        })
    }

    /// Resolves the type of a global element.
    fn resolve_element(&mut self, name: &QName) -> Result<TypeRef, ParseError> {
        let item = self
            .schemas
            .elements
            .get(name)
            .copied()
            .ok_or_else(|| unsupported(format!("element '{name}' is not defined")))?;
        self.element_type(item.node, &name.local)
    }

    fn element_type(&mut self, node: &Element, name: &str) -> Result<TypeRef, ParseError> {
        if let Some(type_name) = qname_attr(node, "type")? {
            return self.resolve_type(&type_name);
        }

        if let Some(inline) = node.child(XSD_NS, "complexType") {
            let key = TypeKey::Anonymous(std::ptr::from_ref(inline));
            if let Some(resolved) = self.resolved.get(&key) {
                return Ok(resolved.clone());
            }
            let model_name = self.anonymous_name(name);
            return self.resolve_complex(key, model_name, inline);
        }

        if let Some(inline) = node.child(XSD_NS, "simpleType") {
            return self.resolve_simple(inline, 0);
        }

        Ok(TypeRef::Primitive(PrimitiveKind::AnyType))
    }

    fn fields_of(&self, type_ref: &TypeRef) -> Option<&[ParameterDescriptor]> {
        match type_ref {
            TypeRef::Complex(name) => Some(&self.types[self.slots[name]].fields),
            _ => None,
        }
    }
}

/// The `base` of a complex type's `complexContent` or `simpleContent` derivation.
fn derivation_base(node: &Element) -> Result<Option<QName>, ParseError> {
    let content = node
        .child(XSD_NS, "complexContent")
        .or_else(|| node.child(XSD_NS, "simpleContent"));

    match content {
        Some(content) => content
            .children
            .iter()
            .find_map(|derivation| qname_attr(derivation, "base").transpose())
            .transpose(),
        None => Ok(None),
    }
}

struct Part<'a> {
    name: &'a str,
    element: Option<QName>,
    type_name: Option<QName>,
}

struct Definitions<'a> {
    target_namespace: Option<&'a str>,
    messages: HashMap<QName, Vec<Part<'a>>>,
    port_types: HashMap<QName, &'a Element>,
    bindings: HashMap<QName, &'a Element>,
}

impl<'a> Definitions<'a> {
    fn collect(root: &'a Element) -> Result<Self, ParseError> {
        let target_namespace = root.attr("targetNamespace");
        let mut messages = HashMap::new();
        let mut port_types = HashMap::new();
        let mut bindings = HashMap::new();

        for node in &root.children {
            if node.namespace.as_deref() != Some(WSDL_NS) {
                continue;
            }

            match node.local_name.as_str() {
                "import" => {
                    let location = node.attr("location").unwrap_or_default();
                    return Err(unsupported(format!(
                        "wsdl import of '{location}' requires an external document"
                    )));
                }
                "message" => {
                    let name = QName::new(target_namespace, required_attr(node, "name")?);
                    let parts = node
                        .children_named(WSDL_NS, "part")
                        .map(|part| -> Result<Part<'a>, ParseError> {
                            Ok(Part {
                                name: required_attr(part, "name")?,
                                element: qname_attr(part, "element")?,
                                type_name: qname_attr(part, "type")?,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    messages.insert(name, parts);
                }
                "portType" => {
                    let name = QName::new(target_namespace, required_attr(node, "name")?);
                    port_types.insert(name, node);
                }
                "binding" => {
                    let name = QName::new(target_namespace, required_attr(node, "name")?);
                    bindings.insert(name, node);
                }
                _ => {}
            }
        }

        Ok(Self {
            target_namespace,
            messages,
            port_types,
            bindings,
        })
    }

    fn message(&self, node: &Element) -> Result<&[Part<'a>], ParseError> {
        let name = required_qname_attr(node, "message")?;
        self.messages
            .get(&name)
            .map(Vec::as_slice)
            .ok_or_else(|| unsupported(format!("message '{name}' is not defined")))
    }
}

/// The SOAP flavour of a `wsdl:binding`, if it has one.
fn soap_binding(binding: &Element) -> Option<(SoapVersion, &Element)> {
    if let Some(soap) = binding.child(SOAP11_NS, "binding") {
        return Some((SoapVersion::Soap11, soap));
    }
    binding
        .child(SOAP12_NS, "binding")
        .map(|soap| (SoapVersion::Soap12, soap))
}

fn soap_ns(version: SoapVersion) -> &'static str {
    match version {
        SoapVersion::Soap11 => SOAP11_NS,
        SoapVersion::Soap12 => SOAP12_NS,
    }
}

/// Builds the [`ServiceModel`] out of a parsed `wsdl:definitions` element.
pub(super) fn build_model(root: &Element) -> Result<ServiceModel, ParseError> {
    if !root.is(WSDL_NS, "definitions") {
        return Err(unsupported(format!(
            "expected a WSDL 1.1 'definitions' root element, found '{}'",
            root.local_name
        )));
    }

    let definitions = Definitions::collect(root)?;
    let schemas = Schemas::collect(root)?;
    let mut resolver = TypeResolver::new(&schemas)?;
    resolver.resolve_all()?;

    let mut services = Vec::new();
    let mut seen = HashSet::new();

    for service in root.children_named(WSDL_NS, "service") {
        let name = required_attr(service, "name")?;
        if !seen.insert(name) {
            return Err(unsupported(format!("service '{name}' is declared twice")));
        }
        services.push(build_service(name, service, &definitions, &mut resolver)?);
    }

    Ok(ServiceModel {
        target_namespace: definitions.target_namespace.map(str::to_string),
        services,
        types: resolver.types,
    })
}

fn build_service(
    name: &str,
    service: &Element,
    definitions: &Definitions<'_>,
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<ServiceDescriptor, ParseError> {
    let mut candidates = Vec::new();

    for port in service.children_named(WSDL_NS, "port") {
        let binding_name = required_qname_attr(port, "binding")?;
        let binding = definitions
            .bindings
            .get(&binding_name)
            .copied()
            .ok_or_else(|| unsupported(format!("binding '{binding_name}' is not defined")))?;

        if let Some((version, soap)) = soap_binding(binding) {
            let endpoint = port
                .child(soap_ns(version), "address")
                .and_then(|address| address.attr("location"))
                .map(str::to_string);
            candidates.push((version, soap, binding, endpoint));
        }
    }

    let selected = candidates
        .iter()
        .find(|(version, ..)| *version == SoapVersion::Soap11)
        .or_else(|| candidates.first());

    let Some((version, soap, binding, endpoint)) = selected else {
        return Ok(ServiceDescriptor {
            name: name.to_string(),
            endpoint: None,
            operations: Vec::new(),
        });
    };

    let operations = build_operations(*version, soap, binding, definitions, resolver)?;

    Ok(ServiceDescriptor {
        name: name.to_string(),
        endpoint: endpoint.clone(),
        operations,
    })
}

fn build_operations(
    version: SoapVersion,
    soap: &Element,
    binding: &Element,
    definitions: &Definitions<'_>,
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<Vec<OperationDescriptor>, ParseError> {
    let port_type_name = required_qname_attr(binding, "type")?;
    let port_type = definitions
        .port_types
        .get(&port_type_name)
        .copied()
        .ok_or_else(|| unsupported(format!("port type '{port_type_name}' is not defined")))?;

    let default_style = soap.attr("style").unwrap_or("document");
    let mut operations: Vec<OperationDescriptor> = Vec::new();

    for operation in port_type.children_named(WSDL_NS, "operation") {
        let name = required_attr(operation, "name")?;
        if operations.iter().any(|op| op.name == name) {
            return Err(unsupported(format!(
                "operation '{name}' is overloaded, which is not supported"
            )));
        }

        let bound = binding
            .children_named(WSDL_NS, "operation")
            .find(|op| op.attr("name") == Some(name));
        let soap_operation = bound.and_then(|op| op.child(soap_ns(version), "operation"));
        let soap_action = soap_operation
            .and_then(|op| op.attr("soapAction"))
            .filter(|action| !action.is_empty())
            .map(str::to_string);
        let style = soap_operation
            .and_then(|op| op.attr("style"))
            .unwrap_or(default_style);
        let body_namespace = bound
            .and_then(|op| op.child(WSDL_NS, "input"))
            .and_then(|input| input.child(soap_ns(version), "body"))
            .and_then(|body| body.attr("namespace"));

        let input = match operation.child(WSDL_NS, "input") {
            Some(input) => definitions.message(input)?,
            None => &[],
        };
        let output = match operation.child(WSDL_NS, "output") {
            Some(output) => Some(definitions.message(output)?),
            None => None,
        };

        let descriptor = if style == "rpc" {
            rpc_operation(name, input, output, resolver)?.finish(
                soap_action,
                version,
                body_namespace.or(definitions.target_namespace),
            )
        } else {
            document_operation(name, input, output, resolver)?.finish(
                soap_action,
                version,
                None,
            )
        };

        let mut seen = HashSet::new();
        if let Some(duplicate) = descriptor
            .parameters
            .iter()
            .find(|param| !seen.insert(param.name.as_str()))
        {
            return Err(unsupported(format!(
                "operation '{name}' declares parameter '{}' twice",
                duplicate.name
            )));
        }

        operations.push(descriptor);
    }

    Ok(operations)
}

/// An operation whose wire metadata is still to be filled in.
struct Shape {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    return_type: TypeRef,
    style: BindingStyle,
    namespace: Option<String>,
    request_element: String,
    qualified_parameters: bool,
    result_element: Option<String>,
}

impl Shape {
    fn finish(
        self,
        soap_action: Option<String>,
        soap_version: SoapVersion,
        namespace_override: Option<&str>,
    ) -> OperationDescriptor {
        OperationDescriptor {
            name: self.name,
            parameters: self.parameters,
            return_type: self.return_type,
            soap_action,
            style: self.style,
            soap_version,
            namespace: namespace_override.map(str::to_string).or(self.namespace),
            request_element: self.request_element,
            qualified_parameters: self.qualified_parameters,
            result_element: self.result_element,
        }
    }
}

fn part_type(part: &Part<'_>, resolver: &mut TypeResolver<'_, '_>) -> Result<TypeRef, ParseError> {
    match (&part.element, &part.type_name) {
        (Some(element), _) => resolver.resolve_element(element),
        (None, Some(type_name)) => resolver.resolve_type(type_name),
        (None, None) => Err(unsupported(format!(
            "message part '{}' has neither an element nor a type",
            part.name
        ))),
    }
}

fn parts_as_parameters(
    parts: &[Part<'_>],
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<Vec<ParameterDescriptor>, ParseError> {
    parts
        .iter()
        .map(|part| -> Result<ParameterDescriptor, ParseError> {
            Ok(ParameterDescriptor {
                name: part.name.to_string(),
                type_ref: part_type(part, resolver)?,
                optional: false,
            })
        })
        .collect()
}

fn first_part_type(
    parts: Option<&[Part<'_>]>,
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<TypeRef, ParseError> {
    match parts.and_then(|parts| parts.first()) {
        Some(part) => part_type(part, resolver),
        None => Ok(TypeRef::Void),
    }
}

fn rpc_operation(
    name: &str,
    input: &[Part<'_>],
    output: Option<&[Part<'_>]>,
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<Shape, ParseError> {
    Ok(Shape {
        name: name.to_string(),
        parameters: parts_as_parameters(input, resolver)?,
        return_type: first_part_type(output, resolver)?,
        style: BindingStyle::Rpc,
        namespace: None,
        request_element: name.to_string(),
        qualified_parameters: false,
        result_element: output
            .and_then(|parts| parts.first())
            .map(|part| part.name.to_string()),
    })
}

/// The wrapper element of a document/literal wrapped message, if the message is wrapped.
fn wrapper<'p>(parts: &'p [Part<'_>]) -> Option<&'p QName> {
    match parts {
        [single] => single.element.as_ref(),
        _ => None,
    }
}

fn document_operation(
    name: &str,
    input: &[Part<'_>],
    output: Option<&[Part<'_>]>,
    resolver: &mut TypeResolver<'_, '_>,
) -> Result<Shape, ParseError> {
    if let Some(element) = wrapper(input).filter(|element| element.local == name) {
        let wrapper_type = resolver.resolve_element(element)?;
        if let Some(fields) = resolver.fields_of(&wrapper_type) {
            let parameters = fields.to_vec();
            let (return_type, result_element) = match output.and_then(wrapper) {
                Some(response) => {
                    let response_type = resolver.resolve_element(response)?;
                    match resolver.fields_of(&response_type) {
                        Some([]) => (TypeRef::Void, None),
                        Some([single]) => (single.type_ref.clone(), Some(single.name.clone())),
                        _ => (response_type, None),
                    }
                }
                None => (first_part_type(output, resolver)?, None),
            };
            let qualified = resolver
                .schemas
                .elements
                .get(element)
                .is_some_and(|item| item.qualified);

            return Ok(Shape {
                name: name.to_string(),
                parameters,
                return_type,
                style: BindingStyle::DocumentWrapped,
                namespace: element.namespace.clone(),
                request_element: element.local.clone(),
                qualified_parameters: qualified,
                result_element,
            });
        }
    }

    let first_element = input.iter().find_map(|part| part.element.as_ref());

    Ok(Shape {
        name: name.to_string(),
        parameters: parts_as_parameters(input, resolver)?,
        return_type: first_part_type(output, resolver)?,
        style: BindingStyle::DocumentBare,
        namespace: first_element.and_then(|element| element.namespace.clone()),
        request_element: first_element
            .map(|element| element.local.clone())
            .unwrap_or_else(|| name.to_string()),
        qualified_parameters: true,
        result_element: None,
    })
}
