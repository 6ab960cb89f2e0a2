//! Declarative content model.
//!
//! Schemas are described as `static` trees of [`ElementRule`]s. Each rule
//! names an element, its attributes, the allowed text and an ordered
//! sequence of child [`Particle`]s with occurrence bounds.

use std::fmt;

/// Namespace-qualified element name. An empty namespace means unqualified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName {
    /// Namespace URI.
    pub namespace: &'static str,
    /// Local name.
    pub name: &'static str,
}

impl QName {
    /// Creates a qualified name.
    #[must_use]
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self { namespace, name }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::namespace::prefix_for(self.namespace) {
            Some(prefix) => write!(f, "{prefix}:{}", self.name),
            None => f.write_str(self.name),
        }
    }
}

/// Constraint on the character data of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRule {
    /// Only whitespace is allowed.
    ElementOnly,
    /// Anything goes.
    Any,
    /// Must contain non-whitespace text.
    NonEmpty,
    /// `true` or `false` (also `1` or `0`).
    Boolean,
    /// One of a fixed set of values.
    Enumeration(&'static [&'static str]),
    /// Base64 encoded data.
    Base64,
}

/// Attribute declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRule {
    /// Local name (attributes are unqualified).
    pub name: &'static str,
    /// Whether the attribute must be present.
    pub required: bool,
    /// Allowed values, if restricted.
    pub values: Option<&'static [&'static str]>,
}

impl AttributeRule {
    /// Required attribute with any value.
    #[must_use]
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            values: None,
        }
    }

    /// Optional attribute with any value.
    #[must_use]
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            values: None,
        }
    }

    /// Restricts the attribute to one of `values`.
    #[must_use]
    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.values = Some(values);
        self
    }
}

/// What an element may contain.
#[derive(Debug, Clone, Copy)]
pub enum Content {
    /// Any children, not checked.
    Any,
    /// Ordered children.
    Sequence(&'static [Particle]),
}

/// A single position in a sequence.
#[derive(Debug, Clone, Copy)]
pub enum Term {
    /// A specific element.
    Element(&'static ElementRule),
    /// Any one of several elements.
    Choice(&'static [&'static ElementRule]),
}

impl Term {
    /// Finds the rule matching `namespace` and `name`.
    #[must_use]
    pub fn matching(&self, namespace: &str, name: &str) -> Option<&'static ElementRule> {
        match self {
            Self::Element(rule) => rule.matches(namespace, name).then_some(*rule),
            Self::Choice(rules) => rules
                .iter()
                .copied()
                .find(|rule| rule.matches(namespace, name)),
        }
    }

    /// Human readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Element(rule) => rule.qname.to_string(),
            Self::Choice(rules) => rules
                .iter()
                .map(|rule| rule.qname.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }
}

/// A term with occurrence bounds. `max: None` is unbounded.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// What may appear.
    pub term: Term,
    /// Minimum occurrences.
    pub min: u32,
    /// Maximum occurrences.
    pub max: Option<u32>,
}

impl Particle {
    /// Exactly once.
    #[must_use]
    pub const fn required(rule: &'static ElementRule) -> Self {
        Self {
            term: Term::Element(rule),
            min: 1,
            max: Some(1),
        }
    }

    /// Zero or one.
    #[must_use]
    pub const fn optional(rule: &'static ElementRule) -> Self {
        Self {
            term: Term::Element(rule),
            min: 0,
            max: Some(1),
        }
    }

    /// `min` or more, unbounded.
    #[must_use]
    pub const fn at_least(rule: &'static ElementRule, min: u32) -> Self {
        Self {
            term: Term::Element(rule),
            min,
            max: None,
        }
    }

    /// Exactly one of `rules`.
    #[must_use]
    pub const fn choice(rules: &'static [&'static ElementRule]) -> Self {
        Self {
            term: Term::Choice(rules),
            min: 1,
            max: Some(1),
        }
    }

    /// Makes the particle optional.
    #[must_use]
    pub const fn or_none(mut self) -> Self {
        self.min = 0;
        self
    }
}

/// Declaration of one element.
#[derive(Debug, Clone, Copy)]
pub struct ElementRule {
    /// Qualified name.
    pub qname: QName,
    /// Declared attributes.
    pub attributes: &'static [AttributeRule],
    /// Child content model.
    pub content: Content,
    /// Text constraint.
    pub text: TextRule,
}

impl ElementRule {
    /// Element with text only.
    #[must_use]
    pub const fn leaf(namespace: &'static str, name: &'static str, text: TextRule) -> Self {
        Self {
            qname: QName::new(namespace, name),
            attributes: &[],
            content: Content::Sequence(&[]),
            text,
        }
    }

    /// Element with ordered children and no text.
    #[must_use]
    pub const fn complex(
        namespace: &'static str,
        name: &'static str,
        children: &'static [Particle],
    ) -> Self {
        Self {
            qname: QName::new(namespace, name),
            attributes: &[],
            content: Content::Sequence(children),
            text: TextRule::ElementOnly,
        }
    }

    /// Element whose content is not checked.
    #[must_use]
    pub const fn open(namespace: &'static str, name: &'static str) -> Self {
        Self {
            qname: QName::new(namespace, name),
            attributes: &[],
            content: Content::Any,
            text: TextRule::Any,
        }
    }

    /// Sets attribute declarations.
    #[must_use]
    pub const fn with_attributes(mut self, attributes: &'static [AttributeRule]) -> Self {
        self.attributes = attributes;
        self
    }

    /// Checks the qualified name.
    #[must_use]
    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.qname.namespace == namespace && self.qname.name == name
    }
}
