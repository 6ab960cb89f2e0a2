//! Namespace-aware element tree.
//!
//! Documents are small (a single SOAP envelope), so the whole document is
//! read into memory and addressed by structural position.

use crate::error::{Error, Result};
use crate::namespace::prefix_for;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

/// Attribute with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI (`None` for unprefixed attributes).
    pub namespace: Option<String>,
    /// Local name.
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

/// XML element with resolved namespace, attributes, children and text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI (`None` when unqualified).
    pub namespace: Option<String>,
    /// Local name.
    pub name: String,
    /// Attributes, excluding namespace declarations.
    pub attributes: Vec<Attribute>,
    /// Child elements in document order.
    pub children: Vec<Self>,
    /// Concatenated character data directly inside this element.
    pub text: String,
}

impl Element {
    /// Checks namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref().unwrap_or("") == namespace
    }

    /// Returns the value of an unprefixed attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.namespace.is_none() && attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, namespace: &str, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.is(namespace, name))
    }

    /// Iterates over children with the given name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, name))
    }

    /// Returns this element and all of its descendants in document order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(element) = pending.pop() {
            out.push(element);
            pending.extend(element.children.iter().rev());
        }
        out
    }

    /// Trimmed text content.
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// Name with its conventional prefix, e.g. `t:ItemId`.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.namespace.as_deref().and_then(prefix_for) {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Reads a document into an element tree.
///
/// # Errors
///
/// Returns an error if the document is not UTF-8, is malformed, uses an
/// undeclared prefix, or does not have exactly one root element.
pub fn parse(document: &[u8]) -> Result<Element> {
    let text = std::str::from_utf8(document)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = NsReader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((resolved, event)) => (namespace_of(&resolved)?, event),
            Err(err) => return Err(Error::syntax(err)),
        };

        match event {
            Event::Start(start) => {
                let element = open_element(&reader, namespace, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&reader, namespace, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::Syntax("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(Error::syntax)?;
                append_text(&mut stack, &value)?;
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append_text(&mut stack, &value)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(Error::Unclosed(open.name));
    }

    root.ok_or(Error::Empty)
}

fn namespace_of(resolved: &ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Ok(Some(String::from_utf8_lossy(namespace.0).into_owned()))
        }
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(Error::UnknownPrefix(
            String::from_utf8_lossy(prefix).into_owned(),
        )),
    }
}

fn open_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(Error::syntax)?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attribute.key);
        let namespace = namespace_of(&resolved)?;
        let value = attribute.unescape_value().map_err(Error::syntax)?;
        attributes.push(Attribute {
            namespace,
            name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(Element {
        namespace,
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::MultipleRoots(element.name));
    }
    *root = Some(element);
    Ok(())
}

fn append_text(stack: &mut [Element], value: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.text.push_str(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(Error::TextOutsideRoot),
    }
}
