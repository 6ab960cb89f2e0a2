//! Namespace URIs used by Exchange Web Services documents.

/// SOAP 1.1 envelope.
pub const SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// EWS types (`t:` prefix).
pub const TYPES: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// EWS messages (`m:` prefix).
pub const MESSAGES: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// XML Schema instance.
pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML Schema.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Outlook autodiscover request.
pub const AUTODISCOVER_REQUEST: &str =
    "http://schemas.microsoft.com/exchange/autodiscover/outlook/requestschema/2006";

/// Autodiscover response envelope.
pub const AUTODISCOVER_RESPONSE: &str =
    "http://schemas.microsoft.com/exchange/autodiscover/responseschema/2006";

/// Outlook autodiscover response payload, also the value sent as the
/// acceptable response schema.
pub const AUTODISCOVER_OUTLOOK_RESPONSE: &str =
    "http://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a";

/// Returns the conventional prefix for a namespace, used in diagnostics.
#[must_use]
pub fn prefix_for(namespace: &str) -> Option<&'static str> {
    match namespace {
        SOAP_ENVELOPE => Some("soap"),
        TYPES => Some("t"),
        MESSAGES => Some("m"),
        XSI => Some("xsi"),
        XSD => Some("xsd"),
        _ => None,
    }
}
