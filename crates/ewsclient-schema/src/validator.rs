//! Document validation against the bundled schemas.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::assertions;
use crate::rules::{Content, ElementRule, TextRule};
use crate::schemas;
use crate::tree::{self, Element};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational.
    Info,
    /// Suspicious but acceptable.
    Warning,
    /// Violation; the document is invalid.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// A single validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human readable message.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates an informational diagnostic.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// One of the bundled schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SchemaName {
    /// SOAP envelopes carrying EWS requests and responses.
    #[default]
    Messages,
    /// Outlook autodiscover request.
    AutodiscoverRequest,
    /// Autodiscover response.
    AutodiscoverResponse,
}

impl SchemaName {
    /// Bundled file name of the schema.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Messages => "messages.xsd",
            Self::AutodiscoverRequest => "autodiscover.request.xsd",
            Self::AutodiscoverResponse => "autodiscover.response.xsd",
        }
    }

    /// Looks a schema up by its bundled file name.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        [
            Self::Messages,
            Self::AutodiscoverRequest,
            Self::AutodiscoverResponse,
        ]
        .into_iter()
        .find(|schema| schema.file_name() == name)
    }

    const fn root(self) -> &'static ElementRule {
        match self {
            Self::Messages => &schemas::ENVELOPE,
            Self::AutodiscoverRequest => &schemas::AUTODISCOVER_REQUEST,
            Self::AutodiscoverResponse => &schemas::AUTODISCOVER_RESPONSE,
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Whether the document passed every check.
    pub valid: bool,
    /// Ordered diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    /// Iterates over error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

/// Validates a document against a bundled schema (default: messages).
///
/// Never fails: malformed documents, structural violations and failed
/// assertions are all reported as diagnostics.
pub fn validate(document: impl AsRef<[u8]>, schema: Option<SchemaName>) -> Validation {
    let schema = schema.unwrap_or_default();

    let root = match tree::parse(document.as_ref()) {
        Ok(root) => root,
        Err(err) => {
            return Validation {
                valid: false,
                diagnostics: vec![
                    Diagnostic::error(format!("failed to parse document: {err}")),
                    Diagnostic::error(format!("document is not valid against {schema}")),
                ],
            };
        }
    };

    let mut violations = Vec::new();
    let rule = schema.root();
    let ns = root.namespace.as_deref().unwrap_or("");
    if rule.matches(ns, &root.name) {
        check_element(&root, rule, &format!("/{}", root.display_name()), &mut violations);
        violations.extend(assertions::check(&root, schema));
    } else {
        violations.push(format!(
            "root element is <{}> ({}), expected <{}> ({})",
            root.name,
            if ns.is_empty() { "no namespace" } else { ns },
            rule.qname.name,
            rule.qname.namespace,
        ));
    }

    if violations.is_empty() {
        return Validation {
            valid: true,
            diagnostics: vec![Diagnostic::info(format!(
                "document is valid against {schema}"
            ))],
        };
    }

    let count = violations.len();
    let mut diagnostics: Vec<_> = violations.into_iter().map(Diagnostic::error).collect();
    diagnostics.push(Diagnostic::error(format!(
        "document is not valid against {schema}: {count} violation(s)"
    )));
    Validation {
        valid: false,
        diagnostics,
    }
}

fn check_element(element: &Element, rule: &ElementRule, path: &str, out: &mut Vec<String>) {
    for attribute in rule.attributes {
        match element.attribute(attribute.name) {
            None if attribute.required => {
                out.push(format!(
                    "{path}: missing required attribute '{}'",
                    attribute.name
                ));
            }
            Some(value) => {
                if let Some(allowed) = attribute.values
                    && !allowed.contains(&value)
                {
                    out.push(format!(
                        "{path}: attribute '{}' has invalid value '{value}' (expected one of {})",
                        attribute.name,
                        allowed.join(", ")
                    ));
                }
            }
            None => {}
        }
    }

    if let Some(problem) = check_text(element.trimmed_text(), rule.text) {
        out.push(format!("{path}: {problem}"));
    }

    let Content::Sequence(particles) = rule.content else {
        return;
    };

    let children = &element.children;
    let mut index = 0;
    for particle in particles {
        let mut count = 0;
        while index < children.len() && particle.max.is_none_or(|max| count < max) {
            let child = &children[index];
            let ns = child.namespace.as_deref().unwrap_or("");
            let Some(child_rule) = particle.term.matching(ns, &child.name) else {
                break;
            };
            let child_path = format!("{path}/{}", child.display_name());
            check_element(child, child_rule, &child_path, out);
            count += 1;
            index += 1;
        }
        if count < particle.min {
            if particle.min > 1 {
                out.push(format!(
                    "{path}: expected at least {} <{}> element(s), found {count}",
                    particle.min,
                    particle.term.describe()
                ));
            } else {
                out.push(format!(
                    "{path}: missing required element <{}>",
                    particle.term.describe()
                ));
            }
        }
    }

    for child in &children[index..] {
        out.push(format!(
            "{path}: unexpected element <{}>",
            child.display_name()
        ));
    }
}

fn check_text(text: &str, rule: TextRule) -> Option<String> {
    match rule {
        TextRule::Any => None,
        TextRule::ElementOnly => (!text.is_empty()).then(|| "unexpected text content".to_string()),
        TextRule::NonEmpty => text.is_empty().then(|| "must not be empty".to_string()),
        TextRule::Boolean => (!matches!(text, "true" | "false" | "1" | "0"))
            .then(|| format!("'{text}' is not a boolean")),
        TextRule::Enumeration(values) => (!values.contains(&text)).then(|| {
            format!("'{text}' is not one of {}", values.join(", "))
        }),
        TextRule::Base64 => {
            let compact: String = text.split_whitespace().collect();
            STANDARD
                .decode(compact.as_bytes())
                .err()
                .map(|err| format!("content is not valid base64: {err}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names() {
        assert_eq!(SchemaName::default(), SchemaName::Messages);
        assert_eq!(
            SchemaName::from_file_name("autodiscover.response.xsd"),
            Some(SchemaName::AutodiscoverResponse)
        );
        assert_eq!(SchemaName::from_file_name("nope.xsd"), None);
        assert_eq!(SchemaName::AutodiscoverRequest.to_string(), "autodiscover.request.xsd");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "INFO");
        assert_eq!(Severity::Warning.to_string(), "WARN");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_check_text() {
        assert!(check_text("", TextRule::ElementOnly).is_none());
        assert!(check_text("x", TextRule::ElementOnly).is_some());
        assert!(check_text("", TextRule::NonEmpty).is_some());
        assert!(check_text("true", TextRule::Boolean).is_none());
        assert!(check_text("yes", TextRule::Boolean).is_some());
        assert!(check_text("aGVs\nbG8=", TextRule::Base64).is_none());
        assert!(check_text("!!!", TextRule::Base64).is_some());
        assert!(check_text("High", TextRule::Enumeration(&["Low", "High"])).is_none());
    }

    #[test]
    fn test_malformed_document() {
        let validation = validate("<a>", None);
        assert!(!validation.valid);
        assert!(validation.diagnostics[0].message.contains("failed to parse"));
    }

    #[test]
    fn test_wrong_root() {
        let validation = validate("<Envelope/>", Some(SchemaName::Messages));
        assert!(!validation.valid);
        assert!(validation.diagnostics[0].message.contains("root element"));
    }
}
