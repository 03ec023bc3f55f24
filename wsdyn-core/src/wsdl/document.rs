//! # XML Document Tree
//!
//! A minimal, namespace-aware element tree built on top of `quick-xml`.
//!
//! WSDL interpretation needs random access (messages reference port types, bindings reference
//! messages, schema types reference each other), so the event stream is materialized into
//! [`Element`]s first. Every element remembers the namespace bindings in scope, which is what
//! makes QName-valued attributes such as `type="tns:Person"` resolvable later on.
use super::ParseError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::rc::Rc;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

type Scope = Rc<HashMap<String, String>>;

/// One XML element with its resolved name, attributes, text content and children.
#[derive(Debug, Clone)]
pub struct Element {
    pub namespace: Option<String>,
    pub local_name: String,
    /// Attributes keyed by their name as written, namespace declarations excluded.
    attributes: Vec<(String, String)>,
    /// Prefix → namespace bindings in scope for this element. The default namespace is keyed by `""`.
    scope: Scope,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Looks up an attribute by its namespace and local name, regardless of the prefix used.
    pub fn attr_ns(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(key, value)| {
            let (prefix, local) = key.split_once(':')?;
            (local == local_name && self.scope.get(prefix).map(String::as_str) == Some(namespace))
                .then_some(value.as_str())
        })
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, local_name))
    }

    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|child| child.is(namespace, local_name))
    }

    /// Resolves a QName-valued string (e.g. `tns:Person`) against the bindings in scope.
    ///
    /// Unprefixed values resolve against the default namespace. Returns `None` when the
    /// prefix is not bound.
    pub fn resolve_qname(&self, value: &str) -> Option<QName> {
        match value.split_once(':') {
            Some((prefix, local)) => {
                let namespace = self.scope.get(prefix)?;
                Some(QName::new(Some(namespace), local))
            }
            None => Some(QName::new(
                self.scope.get("").map(String::as_str),
                value.trim(),
            )),
        }
    }
}

/// Parses `bytes` into the document's root element.
///
/// Any input that is not a single well-formed XML element tree fails with
/// [`ParseError::MalformedDocument`].
pub fn parse(bytes: &[u8]) -> Result<Element, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ParseError::MalformedDocument(format!("document is not valid UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    // Text is kept verbatim, leaf values are significant down to their whitespace.
    let mut reader = Reader::from_str(text);

    let mut base_scope = HashMap::new();
    base_scope.insert("xml".to_string(), XML_NS.to_string());
    let base_scope: Scope = Rc::new(base_scope);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ParseError::MalformedDocument(format!("{e} (at byte {})", reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => {
                let scope = stack
                    .last()
                    .map(|parent| parent.scope.clone())
                    .unwrap_or_else(|| base_scope.clone());
                let element = open_element(&start, scope)?;
                if stack.is_empty() && root.is_some() {
                    return Err(multiple_roots());
                }
                stack.push(element);
            }
            Event::Empty(start) => {
                let scope = stack
                    .last()
                    .map(|parent| parent.scope.clone())
                    .unwrap_or_else(|| base_scope.clone());
                let element = open_element(&start, scope)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                // quick-xml checks that end names match their start tags.
                let mut element = stack.pop().ok_or_else(|| {
                    ParseError::MalformedDocument("unexpected closing tag".to_string())
                })?;
                if !element.children.is_empty() && element.text.trim().is_empty() {
                    element.text.clear();
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
                push_text(&mut stack, &content)?;
            }
            Event::CData(data) => {
                let content = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
                push_text(&mut stack, &content)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::MalformedDocument(format!(
            "unexpected end of document, element '{}' is not closed",
            open.local_name
        )));
    }

    root.ok_or_else(|| ParseError::MalformedDocument("document has no root element".to_string()))
}

fn multiple_roots() -> ParseError {
    ParseError::MalformedDocument("document has more than one root element".to_string())
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(multiple_roots()),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], content: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(element) => element.text.push_str(content),
        None if content.trim().is_empty() => {}
        None => {
            return Err(ParseError::MalformedDocument(
                "text content outside of the root element".to_string(),
            ));
        }
    }
    Ok(())
}

fn open_element(start: &BytesStart<'_>, parent_scope: Scope) -> Result<Element, ParseError> {
    let mut declarations = Vec::new();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::MalformedDocument(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ParseError::MalformedDocument(e.to_string()))?
            .into_owned();

        if key == "xmlns" {
            declarations.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value));
        } else {
            attributes.push((key, value));
        }
    }

    let scope = if declarations.is_empty() {
        parent_scope
    } else {
        let mut scope = (*parent_scope).clone();
        for (prefix, namespace) in declarations {
            if namespace.is_empty() {
                scope.remove(&prefix);
            } else {
                scope.insert(prefix, namespace);
            }
        }
        Rc::new(scope)
    };

    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| ParseError::MalformedDocument(e.to_string()))?
        .to_string();

    let (prefix, local_name) = match name.split_once(':') {
        Some((prefix, local)) => (prefix, local.to_string()),
        None => ("", name.clone()),
    };

    let namespace = match scope.get(prefix) {
        Some(namespace) => Some(namespace.clone()),
        None if prefix.is_empty() => None,
        None => {
            return Err(ParseError::MalformedDocument(format!(
                "namespace prefix '{prefix}' of element '{name}' is not bound"
            )));
        }
    };

    Ok(Element {
        namespace,
        local_name,
        attributes,
        scope,
        children: Vec::new(),
        text: String::new(),
    })
}
