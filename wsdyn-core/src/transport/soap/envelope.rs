//! # SOAP Envelope Codec
//!
//! Converts bound arguments into a SOAP request envelope and response envelopes back into
//! `serde_json::Value`s.
//!
//! ## Encoding (JSON -> XML)
//!
//! * Document/literal wrapped and RPC operations wrap their arguments in an element named after
//!   the request element; document/literal bare operations put each argument directly in the body.
//! * Objects become nested elements, arrays become repeated elements and `null` becomes an
//!   `xsi:nil` element.
//!
//! ## Decoding (XML -> JSON)
//!
//! * Leaf elements become strings, elements with children become objects and repeated children
//!   become arrays.
//! * Wrapped and RPC responses are unwrapped down to the result element declared by the
//!   operation. Responses declaring several children are returned whole.
use crate::model::{BindingStyle, OperationDescriptor, SoapVersion};
use crate::transport::TransportError;
use crate::wsdl::document::{self, Element};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

pub const SOAP11_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP12_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

const OPERATION_PREFIX: &str = "m";

fn envelope_namespace(version: SoapVersion) -> &'static str {
    match version {
        SoapVersion::Soap11 => SOAP11_ENVELOPE_NS,
        SoapVersion::Soap12 => SOAP12_ENVELOPE_NS,
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TransportError> {
    writer
        .write_event(event)
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))
}

fn qualify(qualified: bool, local: &str) -> String {
    if qualified {
        format!("{OPERATION_PREFIX}:{local}")
    } else {
        local.to_string()
    }
}

/// Builds the request envelope for `operation`.
pub fn encode(
    operation: &OperationDescriptor,
    arguments: &[(String, Value)],
) -> Result<String, TransportError> {
    let namespaced = operation.namespace.is_some();
    let qualified = namespaced && operation.qualified_parameters;
    let mut writer = Writer::new(Vec::new());

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    let mut envelope = BytesStart::new("soap:Envelope");
    envelope.push_attribute(("xmlns:soap", envelope_namespace(operation.soap_version)));
    envelope.push_attribute(("xmlns:xsi", XSI_NS));
    if let Some(namespace) = &operation.namespace {
        envelope.push_attribute((format!("xmlns:{OPERATION_PREFIX}").as_str(), namespace.as_str()));
    }
    write(&mut writer, Event::Start(envelope))?;
    write(&mut writer, Event::Start(BytesStart::new("soap:Body")))?;

    match operation.style {
        BindingStyle::DocumentWrapped | BindingStyle::Rpc => {
            let wrapper = qualify(namespaced, &operation.request_element);
            write(&mut writer, Event::Start(BytesStart::new(wrapper.as_str())))?;
            for (name, value) in arguments {
                write_value(&mut writer, &qualify(qualified, name), value, qualified)?;
            }
            write(&mut writer, Event::End(BytesEnd::new(wrapper.as_str())))?;
        }
        BindingStyle::DocumentBare => {
            for (idx, (name, value)) in arguments.iter().enumerate() {
                // Only the first part's element name is recorded by the model.
                let element = if idx == 0 {
                    &operation.request_element
                } else {
                    name
                };
                write_value(&mut writer, &qualify(namespaced, element), value, qualified)?;
            }
        }
    }

    write(&mut writer, Event::End(BytesEnd::new("soap:Body")))?;
    write(&mut writer, Event::End(BytesEnd::new("soap:Envelope")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| TransportError::InvalidRequest(e.to_string()))
}

fn write_value(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
    qualified: bool,
) -> Result<(), TransportError> {
    match value {
        Value::Null => {
            let mut element = BytesStart::new(name);
            element.push_attribute(("xsi:nil", "true"));
            write(writer, Event::Empty(element))
        }
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| write_value(writer, name, item, qualified)),
        Value::Object(fields) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (field, value) in fields {
                write_value(writer, &qualify(qualified, field), value, qualified)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
        Value::String(text) => write_text(writer, name, text),
        Value::Bool(flag) => write_text(writer, name, &flag.to_string()),
        Value::Number(number) => write_text(writer, name, &number.to_string()),
    }
}

fn write_text(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), TransportError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

/// Decodes a response body received with HTTP `status`.
pub fn decode(
    body: &str,
    status: u16,
    operation: &OperationDescriptor,
) -> Result<Value, TransportError> {
    let success = (200..300).contains(&status);
    let status_error = || TransportError::Status {
        status,
        body: body.to_string(),
    };

    let root = match document::parse(body.as_bytes()) {
        Ok(root) => root,
        Err(_) if !success => return Err(status_error()),
        Err(err) => return Err(TransportError::InvalidResponse(err.to_string())),
    };

    let envelope_ns = match root.namespace.as_deref() {
        Some(ns @ (SOAP11_ENVELOPE_NS | SOAP12_ENVELOPE_NS)) if root.local_name == "Envelope" => {
            ns
        }
        _ if !success => return Err(status_error()),
        _ => {
            return Err(TransportError::InvalidResponse(format!(
                "expected a SOAP envelope, found '{}'",
                root.local_name
            )));
        }
    };

    let soap_body = root
        .child(envelope_ns, "Body")
        .ok_or_else(|| TransportError::InvalidResponse("the envelope has no Body".to_string()))?;
    let payload = soap_body.children.first();

    if let Some(fault) = payload.filter(|element| element.is(envelope_ns, "Fault")) {
        return Err(fault_error(fault));
    }
    if !success {
        return Err(status_error());
    }
    if operation.return_type.is_void() {
        return Ok(Value::Null);
    }

    let Some(payload) = payload else {
        return Ok(Value::Null);
    };

    Ok(match (operation.style, &operation.result_element) {
        (BindingStyle::DocumentBare, _) | (_, None) => element_value(payload),
        (_, Some(result)) => result_value(payload, result),
    })
}

/// Selects the `name` children of a response element. A missing result is `null`.
fn result_value(response: &Element, name: &str) -> Value {
    let mut values: Vec<Value> = response
        .children
        .iter()
        .filter(|child| child.local_name == name)
        .map(element_value)
        .collect();

    match values.len() {
        0 => Value::Null,
        1 => values.remove(0),
        _ => Value::Array(values),
    }
}

/// Converts an element into a JSON value. Repeated child names collapse into arrays.
pub fn element_value(element: &Element) -> Value {
    if element.attr_ns(XSI_NS, "nil") == Some("true") {
        return Value::Null;
    }
    if element.children.is_empty() {
        return Value::String(element.text.clone());
    }

    let mut groups: Vec<(&str, Vec<Value>)> = Vec::new();
    for child in &element.children {
        let value = element_value(child);
        match groups.iter_mut().find(|(name, _)| *name == child.local_name) {
            Some((_, values)) => values.push(value),
            None => groups.push((child.local_name.as_str(), vec![value])),
        }
    }

    let fields: Map<String, Value> = groups
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            (name.to_string(), value)
        })
        .collect();

    Value::Object(fields)
}

fn descend<'e>(element: &'e Element, path: &[&str]) -> Option<&'e Element> {
    path.iter().try_fold(element, |current, name| {
        current
            .children
            .iter()
            .find(|child| child.local_name == *name)
    })
}

/// Extracts code and reason from a SOAP 1.1 (`faultcode`) or SOAP 1.2 (`Code/Value`) fault.
fn fault_error(fault: &Element) -> TransportError {
    let text = |paths: &[&[&str]]| {
        paths
            .iter()
            .find_map(|path| descend(fault, path))
            .map(|element| element.text.trim().to_string())
            .unwrap_or_default()
    };

    TransportError::Fault {
        code: text(&[&["faultcode"], &["Code", "Value"]]),
        message: text(&[&["faultstring"], &["Reason", "Text"]]),
    }
}
