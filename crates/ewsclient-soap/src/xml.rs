//! Minimal element builder serialized with `quick-xml`.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};

/// An element under construction. Names carry their prefix (`t:Message`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Self>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates an element holding only text.
    #[must_use]
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child in place.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Element name including prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child elements.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Serializes the element as an indented UTF-8 document with an XML
    /// declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_document(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(Error::xml)?;
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner().into_inner()).map_err(Error::xml)
    }

    fn write(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.text.is_none() && self.children.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(Error::xml);
        }

        writer.write_event(Event::Start(start)).map_err(Error::xml)?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(Error::xml)?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(Error::xml)
    }
}
