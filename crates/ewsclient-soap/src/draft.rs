//! Email draft builder producing a `CreateItem` request.

use std::fmt;
use std::str::FromStr;

use crate::address::{extract_address, filter_addresses};
use crate::error::{Error, Result};
use crate::log::Diagnostics;
use crate::request::{Finalized, RequestKind, distinguished_folder, envelope, finalize};
use crate::xml::XmlElement;

/// Message sensitivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sensitivity {
    /// No restriction.
    #[default]
    Normal,
    /// Personal.
    Personal,
    /// Private.
    Private,
    /// Confidential.
    Confidential,
}

impl Sensitivity {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Personal => "Personal",
            Self::Private => "Private",
            Self::Confidential => "Confidential",
        }
    }
}

impl FromStr for Sensitivity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Normal" => Ok(Self::Normal),
            "Personal" => Ok(Self::Personal),
            "Private" => Ok(Self::Private),
            "Confidential" => Ok(Self::Confidential),
            _ => Err(Error::invalid_value("sensitivity", s)),
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message importance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Importance {
    /// Low.
    Low,
    /// Normal.
    #[default]
    Normal,
    /// High.
    High,
}

impl Importance {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

impl FromStr for Importance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(Self::Low),
            "Normal" => Ok(Self::Normal),
            "High" => Ok(Self::High),
            _ => Err(Error::invalid_value("importance", s)),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BodyFormat {
    /// `plain`, sent as `BodyType="Text"`.
    #[default]
    Text,
    /// `html`, sent as `BodyType="HTML"`.
    Html,
}

impl BodyFormat {
    /// `BodyType` attribute value.
    #[must_use]
    pub const fn body_type(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Html => "HTML",
        }
    }

    /// Name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "plain",
            Self::Html => "html",
        }
    }
}

impl FromStr for BodyFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            _ => Err(Error::invalid_value("format", s)),
        }
    }
}

/// Email draft. Every field is optional; `finalize` turns it into a
/// `CreateItem` request that saves the message under Drafts.
#[derive(Debug, Clone)]
pub struct EmailDraft {
    subject: Option<String>,
    body: Option<String>,
    sender: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    sensitivity: Option<Sensitivity>,
    importance: Option<Importance>,
    format: BodyFormat,
    read_receipt: bool,
    delivery_receipt: bool,
    is_read: Option<bool>,
    diagnostics: Diagnostics,
}

impl Default for EmailDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subject: None,
            body: None,
            sender: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            sensitivity: None,
            importance: None,
            format: BodyFormat::default(),
            read_receipt: false,
            delivery_receipt: false,
            is_read: None,
            diagnostics: Diagnostics::new("email"),
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the sender. A value without an address is dropped with a WARN.
    #[must_use]
    pub fn with_sender(mut self, sender: &str) -> Self {
        match extract_address(sender) {
            Some(address) => self.sender = Some(address.to_string()),
            None => self
                .diagnostics
                .warn(format!("sender: '{sender}' is not a valid email address, ignored")),
        }
        self
    }

    /// Sets the To recipients, keeping only entries with an address.
    #[must_use]
    pub fn with_to<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.to = filter_addresses(recipients, "to", &mut self.diagnostics);
        self
    }

    /// Sets the Cc recipients, keeping only entries with an address.
    #[must_use]
    pub fn with_cc<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cc = filter_addresses(recipients, "cc", &mut self.diagnostics);
        self
    }

    /// Sets the Bcc recipients, keeping only entries with an address.
    #[must_use]
    pub fn with_bcc<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bcc = filter_addresses(recipients, "bcc", &mut self.diagnostics);
        self
    }

    /// Sets the sensitivity.
    #[must_use]
    pub const fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    /// Sets the importance.
    #[must_use]
    pub const fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Sets the body format.
    #[must_use]
    pub const fn with_format(mut self, format: BodyFormat) -> Self {
        self.format = format;
        self
    }

    /// Parses and sets the sensitivity; an unknown name is logged and ignored.
    #[must_use]
    pub fn sensitivity_named(self, name: &str) -> Self {
        match name.parse() {
            Ok(value) => self.with_sensitivity(value),
            Err(err) => self.rejected(&err),
        }
    }

    /// Parses and sets the importance; an unknown name is logged and ignored.
    #[must_use]
    pub fn importance_named(self, name: &str) -> Self {
        match name.parse() {
            Ok(value) => self.with_importance(value),
            Err(err) => self.rejected(&err),
        }
    }

    /// Parses and sets the body format; an unknown name is logged and ignored.
    #[must_use]
    pub fn format_named(self, name: &str) -> Self {
        match name.parse() {
            Ok(value) => self.with_format(value),
            Err(err) => self.rejected(&err),
        }
    }

    /// Requests a read receipt.
    #[must_use]
    pub const fn with_read_receipt(mut self, requested: bool) -> Self {
        self.read_receipt = requested;
        self
    }

    /// Requests a delivery receipt.
    #[must_use]
    pub const fn with_delivery_receipt(mut self, requested: bool) -> Self {
        self.delivery_receipt = requested;
        self
    }

    /// Sets the read flag of the saved item.
    #[must_use]
    pub const fn with_is_read(mut self, read: bool) -> Self {
        self.is_read = Some(read);
        self
    }

    fn rejected(mut self, err: &Error) -> Self {
        self.diagnostics.warn(err.to_string());
        self
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Populated fields as `name => value` lines.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        let mut add = |name: &str, value: String| fields.push(format!("{name} => {value}"));

        if let Some(subject) = &self.subject {
            add("subject", subject.clone());
        }
        if let Some(body) = &self.body {
            add("body", body.clone());
        }
        add("format", self.format.as_str().to_string());
        if let Some(sender) = &self.sender {
            add("sender", sender.clone());
        }
        for (name, list) in [("to", &self.to), ("cc", &self.cc), ("bcc", &self.bcc)] {
            if !list.is_empty() {
                add(name, list.join(", "));
            }
        }
        if let Some(sensitivity) = self.sensitivity {
            add("sensitivity", sensitivity.to_string());
        }
        if let Some(importance) = self.importance {
            add("importance", importance.to_string());
        }
        if self.read_receipt {
            add("read_receipt", "true".into());
        }
        if self.delivery_receipt {
            add("delivery_receipt", "true".into());
        }
        if let Some(read) = self.is_read {
            add("is_read", read.to_string());
        }
        fields
    }

    /// Builds and validates the `CreateItem` request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be serialized or fails schema
    /// validation.
    pub fn finalize(self) -> Result<Finalized> {
        let message = self.message();
        let operation = XmlElement::new("m:CreateItem")
            .attr("MessageDisposition", "SaveOnly")
            .child(distinguished_folder("m:SavedItemFolderId", "drafts"))
            .child(XmlElement::new("m:Items").child(message));

        finalize(RequestKind::CreateItem, &envelope(operation), self.diagnostics)
    }

    fn message(&self) -> XmlElement {
        let mut message =
            XmlElement::new("t:Message").child(XmlElement::leaf("t:ItemClass", "IPM.Note"));

        if let Some(subject) = &self.subject {
            message.push(XmlElement::leaf("t:Subject", subject));
        }
        if let Some(sensitivity) = self.sensitivity {
            message.push(XmlElement::leaf("t:Sensitivity", sensitivity.as_str()));
        }
        if let Some(body) = &self.body {
            message.push(
                XmlElement::leaf("t:Body", body).attr("BodyType", self.format.body_type()),
            );
        }
        if let Some(importance) = self.importance {
            message.push(XmlElement::leaf("t:Importance", importance.as_str()));
        }
        for (element, list) in [
            ("t:ToRecipients", &self.to),
            ("t:CcRecipients", &self.cc),
            ("t:BccRecipients", &self.bcc),
        ] {
            if list.is_empty() {
                continue;
            }
            let mut recipients = XmlElement::new(element);
            for address in list {
                recipients.push(mailbox(address));
            }
            message.push(recipients);
        }
        if self.read_receipt {
            message.push(XmlElement::leaf("t:IsReadReceiptRequested", "true"));
        }
        if self.delivery_receipt {
            message.push(XmlElement::leaf("t:IsDeliveryReceiptRequested", "true"));
        }
        if let Some(sender) = &self.sender {
            message.push(XmlElement::new("t:From").child(mailbox(sender)));
        }
        if let Some(read) = self.is_read {
            message.push(XmlElement::leaf("t:IsRead", read.to_string()));
        }
        message
    }
}

fn mailbox(address: &str) -> XmlElement {
    XmlElement::new("t:Mailbox").child(XmlElement::leaf("t:EmailAddress", address))
}
