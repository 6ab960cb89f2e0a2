//! Serialized requests and the builders that need no state.

use std::fmt;

use ewsclient_schema::namespace::{
    AUTODISCOVER_OUTLOOK_RESPONSE, AUTODISCOVER_REQUEST, MESSAGES, SOAP_ENVELOPE, TYPES, XSD, XSI,
};
use ewsclient_schema::{SchemaName, Validation, validate};

use crate::error::{Error, Result};
use crate::item::ItemId;
use crate::log::Diagnostics;
use crate::xml::XmlElement;

/// Operation carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Save a draft message.
    CreateItem,
    /// Attach files to a saved item.
    CreateAttachment,
    /// Send a saved item.
    SendItem,
    /// Resolve the service endpoint.
    Autodiscover,
}

impl RequestKind {
    /// Operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateItem => "CreateItem",
            Self::CreateAttachment => "CreateAttachment",
            Self::SendItem => "SendItem",
            Self::Autodiscover => "Autodiscover",
        }
    }

    /// Schema the serialized request must satisfy.
    #[must_use]
    pub const fn schema(self) -> SchemaName {
        match self {
            Self::Autodiscover => SchemaName::AutodiscoverRequest,
            _ => SchemaName::Messages,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A serialized request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    kind: RequestKind,
    xml: String,
}

impl SoapRequest {
    /// Serializes `root` as a request of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn from_element(kind: RequestKind, root: &XmlElement) -> Result<Self> {
        Ok(Self {
            kind,
            xml: root.to_document()?,
        })
    }

    /// Operation carried by the request.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Request document.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Validates the document against the schema of its kind.
    #[must_use]
    pub fn validate(&self) -> Validation {
        validate(&self.xml, Some(self.kind.schema()))
    }
}

impl fmt::Display for SoapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.xml)
    }
}

/// A validated request plus the diagnostics collected while building it.
#[derive(Debug, Clone)]
pub struct Finalized {
    /// The request.
    pub request: SoapRequest,
    /// Builder diagnostics, ending with the validation verdict.
    pub diagnostics: Diagnostics,
}

/// Wraps an operation element in a SOAP envelope declaring the usual
/// prefixes.
#[must_use]
pub fn envelope(operation: XmlElement) -> XmlElement {
    XmlElement::new("soap:Envelope")
        .attr("xmlns:soap", SOAP_ENVELOPE)
        .attr("xmlns:t", TYPES)
        .attr("xmlns:m", MESSAGES)
        .attr("xmlns:xsi", XSI)
        .attr("xmlns:xsd", XSD)
        .child(XmlElement::new("soap:Body").child(operation))
}

/// Serializes and validates a request; an invalid request is an error.
pub(crate) fn finalize(
    kind: RequestKind,
    root: &XmlElement,
    mut diagnostics: Diagnostics,
) -> Result<Finalized> {
    let request = SoapRequest::from_element(kind, root)?;
    let validation = request.validate();
    diagnostics.record_validation(&validation);
    if !validation.valid {
        return Err(Error::InvalidRequest {
            diagnostics: validation.diagnostics,
        });
    }
    diagnostics.debug(request.xml());
    Ok(Finalized {
        request,
        diagnostics,
    })
}

pub(crate) fn distinguished_folder(element: &str, folder: &str) -> XmlElement {
    XmlElement::new(element).child(XmlElement::new("t:DistinguishedFolderId").attr("Id", folder))
}

/// Builds the `SendItem` request that sends a saved item and files a copy
/// under Sent Items.
///
/// # Errors
///
/// Returns an error if the request cannot be serialized or fails schema
/// validation.
pub fn send_item_request(item: &ItemId) -> Result<Finalized> {
    let operation = XmlElement::new("m:SendItem")
        .attr("SaveItemToFolder", "true")
        .child(
            XmlElement::new("m:ItemIds").child(
                XmlElement::new("t:ItemId")
                    .attr("Id", &item.id)
                    .attr("ChangeKey", &item.change_key),
            ),
        )
        .child(distinguished_folder("m:SavedItemFolderId", "sentitems"));

    finalize(
        RequestKind::SendItem,
        &envelope(operation),
        Diagnostics::new("send"),
    )
}

/// Builds the Outlook autodiscover request for `email`.
///
/// The document is not validated here; the session validates it before
/// sending.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn autodiscover_request(email: &str) -> Result<SoapRequest> {
    let root = XmlElement::new("Autodiscover")
        .attr("xmlns", AUTODISCOVER_REQUEST)
        .child(
            XmlElement::new("Request")
                .child(XmlElement::leaf("EMailAddress", email))
                .child(XmlElement::leaf(
                    "AcceptableResponseSchema",
                    AUTODISCOVER_OUTLOOK_RESPONSE,
                )),
        );
    SoapRequest::from_element(RequestKind::Autodiscover, &root)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_send_item_request() {
        let finalized = send_item_request(&ItemId::new("A1", "C1")).unwrap();
        let xml = finalized.request.xml();
        assert!(xml.contains("<m:SendItem SaveItemToFolder=\"true\">"));
        assert!(xml.contains("<t:ItemId Id=\"A1\" ChangeKey=\"C1\"/>"));
        assert!(xml.contains("<t:DistinguishedFolderId Id=\"sentitems\"/>"));
        assert_eq!(finalized.request.kind(), RequestKind::SendItem);
        assert!(!finalized.diagnostics.has_errors());
    }

    #[test]
    fn test_autodiscover_request_is_valid() {
        let request = autodiscover_request("alice@example.com").unwrap();
        assert!(request.xml().contains("<EMailAddress>alice@example.com</EMailAddress>"));
        assert!(request.xml().contains(AUTODISCOVER_OUTLOOK_RESPONSE));
        assert!(request.validate().valid);
    }

    #[test]
    fn test_autodiscover_request_for_bad_address_fails_validation() {
        let request = autodiscover_request("alice").unwrap();
        assert!(!request.validate().valid);
    }

    #[test]
    fn test_kind_schema() {
        assert_eq!(RequestKind::Autodiscover.schema(), SchemaName::AutodiscoverRequest);
        assert_eq!(RequestKind::SendItem.schema(), SchemaName::Messages);
    }
}
