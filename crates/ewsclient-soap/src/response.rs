//! Response parsing.
//!
//! Responses are walked at a fixed depth below each `m:ResponseMessages`:
//! the `*ResponseMessage`, one child, one grandchild and the leaf holding
//! the identifiers. Identifiers nested any deeper are not looked for.

use ewsclient_schema::Element;
use ewsclient_schema::namespace::{MESSAGES, SOAP_ENVELOPE, TYPES};
use ewsclient_schema::tree;

use crate::error::Result;
use crate::item::ItemId;
use crate::log::Diagnostics;

/// Which request a response answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `CreateItem`: the saved draft's identity is captured.
    Draft,
    /// `CreateAttachment`: attachment ids and the refreshed parent identity
    /// are captured.
    #[default]
    Attachment,
    /// `SendItem`: the send confirmation is captured.
    SendAndSave,
}

impl Stage {
    /// Name of the response message element for this stage.
    #[must_use]
    pub const fn response_message(self) -> &'static str {
        match self {
            Self::Draft => "CreateItemResponseMessage",
            Self::Attachment => "CreateAttachmentResponseMessage",
            Self::SendAndSave => "SendItemResponseMessage",
        }
    }

    /// Short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "save_only",
            Self::Attachment => "attachment",
            Self::SendAndSave => "send_and_save",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a response told us.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSummary {
    /// Identity of the created draft.
    pub item: Option<ItemId>,
    /// Ids of created attachments.
    pub attachment_ids: Vec<String>,
    /// Parent identity after attachments changed it.
    pub root_item: Option<ItemId>,
    /// Whether the item was sent.
    pub sent: bool,
    /// `ResponseCode` of every response message, in order.
    pub response_codes: Vec<String>,
}

/// Parses a response document for the given stage.
///
/// Non-success response messages and SOAP faults are recorded as WARN
/// entries in `log`.
///
/// # Errors
///
/// Returns an error if the document cannot be read.
pub fn parse_response(xml: &str, stage: Stage, log: &mut Diagnostics) -> Result<ResponseSummary> {
    let root = tree::parse(xml.as_bytes())?;
    let mut summary = ResponseSummary::default();

    for fault in root
        .descendants()
        .into_iter()
        .filter(|e| e.is(SOAP_ENVELOPE, "Fault"))
    {
        let text = fault
            .child("", "faultstring")
            .map_or("unknown fault", Element::trimmed_text);
        log.warn(format!("SOAP fault: {text}"));
    }

    for messages in root
        .descendants()
        .into_iter()
        .filter(|e| e.is(MESSAGES, "ResponseMessages"))
    {
        for message in messages.children_named(MESSAGES, stage.response_message()) {
            read_message(message, stage, &mut summary, log);
        }
    }

    match stage {
        Stage::Draft => match &summary.item {
            Some(item) => log.info(format!("draft saved: {item}")),
            None => log.warn("response carries no item id"),
        },
        Stage::Attachment => {
            log.info(format!("{} attachment(s) created", summary.attachment_ids.len()));
        }
        Stage::SendAndSave if summary.sent => log.info("item sent"),
        Stage::SendAndSave => log.warn("item was not confirmed as sent"),
    }

    Ok(summary)
}

fn read_message(message: &Element, stage: Stage, summary: &mut ResponseSummary, log: &mut Diagnostics) {
    // Ids are only trusted from messages that explicitly succeeded.
    let class = message.attribute("ResponseClass").unwrap_or_default();
    let success = class == "Success";
    let code = message
        .child(MESSAGES, "ResponseCode")
        .map(Element::trimmed_text);
    if let Some(code) = code {
        summary.response_codes.push(code.to_string());
    }

    if !success {
        let class = if class.is_empty() { "(no class)" } else { class };
        let text = message
            .child(MESSAGES, "MessageText")
            .map_or("", Element::trimmed_text);
        log.warn(format!(
            "{}: {class} {} {text}",
            stage.response_message(),
            code.unwrap_or("(no code)")
        ));
    }

    match stage {
        _ if !success => {}
        Stage::Draft => {
            for leaf in leaves(message, "Items", "ItemId") {
                if let (Some(id), Some(change_key)) =
                    (leaf.attribute("Id"), leaf.attribute("ChangeKey"))
                {
                    summary.item = Some(ItemId::new(id, change_key));
                }
            }
        }
        Stage::Attachment => {
            for leaf in leaves(message, "Attachments", "AttachmentId") {
                if let Some(id) = leaf.attribute("Id") {
                    summary.attachment_ids.push(id.to_string());
                }
                if let (Some(id), Some(change_key)) = (
                    leaf.attribute("RootItemId"),
                    leaf.attribute("RootItemChangeKey"),
                ) {
                    summary.root_item = Some(ItemId::new(id, change_key));
                }
            }
        }
        Stage::SendAndSave => {
            if code == Some("NoError") {
                summary.sent = true;
            }
        }
    }
}

/// `t:<leaf>` elements exactly two levels below `m:<child>`.
fn leaves<'a>(message: &'a Element, child: &'a str, leaf: &'a str) -> impl Iterator<Item = &'a Element> {
    message
        .children_named(MESSAGES, child)
        .flat_map(|child| child.children.iter())
        .flat_map(move |grandchild| grandchild.children_named(TYPES, leaf))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> String {
        format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"
                xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages"
                xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
              <s:Body>{body}</s:Body></s:Envelope>"#
        )
    }

    #[test]
    fn test_draft_item_id() {
        let xml = envelope(
            r#"<m:CreateItemResponse><m:ResponseMessages>
                 <m:CreateItemResponseMessage ResponseClass="Success">
                   <m:ResponseCode>NoError</m:ResponseCode>
                   <m:Items><t:Message><t:ItemId Id="A1" ChangeKey="C1"/></t:Message></m:Items>
                 </m:CreateItemResponseMessage>
               </m:ResponseMessages></m:CreateItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Draft, &mut log).unwrap();
        assert_eq!(summary.item, Some(ItemId::new("A1", "C1")));
        assert_eq!(summary.response_codes, ["NoError"]);
        assert!(!log.has_errors());
    }

    #[test]
    fn test_attachment_ids_and_root_refresh() {
        let xml = envelope(
            r#"<m:CreateAttachmentResponse><m:ResponseMessages>
                 <m:CreateAttachmentResponseMessage ResponseClass="Success">
                   <m:ResponseCode>NoError</m:ResponseCode>
                   <m:Attachments>
                     <t:FileAttachment><t:AttachmentId Id="X1" RootItemId="A1" RootItemChangeKey="C2"/></t:FileAttachment>
                     <t:FileAttachment><t:AttachmentId Id="X2" RootItemId="A1" RootItemChangeKey="C3"/></t:FileAttachment>
                   </m:Attachments>
                 </m:CreateAttachmentResponseMessage>
               </m:ResponseMessages></m:CreateAttachmentResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Attachment, &mut log).unwrap();
        assert_eq!(summary.attachment_ids, ["X1", "X2"]);
        assert_eq!(summary.root_item, Some(ItemId::new("A1", "C3")));
    }

    #[test]
    fn test_send_confirmation() {
        let xml = envelope(
            r#"<m:SendItemResponse><m:ResponseMessages>
                 <m:SendItemResponseMessage ResponseClass="Success">
                   <m:ResponseCode>NoError</m:ResponseCode>
                 </m:SendItemResponseMessage>
               </m:ResponseMessages></m:SendItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        assert!(parse_response(&xml, Stage::SendAndSave, &mut log).unwrap().sent);
    }

    #[test]
    fn test_error_message_is_warned() {
        let xml = envelope(
            r#"<m:SendItemResponse><m:ResponseMessages>
                 <m:SendItemResponseMessage ResponseClass="Error">
                   <m:MessageText>The specified object was not found in the store.</m:MessageText>
                   <m:ResponseCode>ErrorItemNotFound</m:ResponseCode>
                 </m:SendItemResponseMessage>
               </m:ResponseMessages></m:SendItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::SendAndSave, &mut log).unwrap();
        assert!(!summary.sent);
        assert!(log.iter().any(|e| e.message.contains("ErrorItemNotFound")));
    }

    #[test]
    fn test_error_response_captures_nothing() {
        let xml = envelope(
            r#"<m:CreateItemResponse><m:ResponseMessages>
                 <m:CreateItemResponseMessage ResponseClass="Error">
                   <m:MessageText>Mailbox is full.</m:MessageText>
                   <m:ResponseCode>ErrorQuotaExceeded</m:ResponseCode>
                   <m:Items><t:Message><t:ItemId Id="A1" ChangeKey="C1"/></t:Message></m:Items>
                 </m:CreateItemResponseMessage>
               </m:ResponseMessages></m:CreateItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Draft, &mut log).unwrap();
        assert_eq!(summary.item, None);
        assert_eq!(summary.response_codes, ["ErrorQuotaExceeded"]);
        assert!(log.iter().any(|e| e.message.contains("ErrorQuotaExceeded")));
    }

    #[test]
    fn test_warning_response_captures_nothing() {
        let xml = envelope(
            r#"<m:CreateAttachmentResponse><m:ResponseMessages>
                 <m:CreateAttachmentResponseMessage ResponseClass="Warning">
                   <m:ResponseCode>ErrorBatchProcessingStopped</m:ResponseCode>
                   <m:Attachments>
                     <t:FileAttachment><t:AttachmentId Id="X1" RootItemId="A1" RootItemChangeKey="C2"/></t:FileAttachment>
                   </m:Attachments>
                 </m:CreateAttachmentResponseMessage>
               </m:ResponseMessages></m:CreateAttachmentResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Attachment, &mut log).unwrap();
        assert!(summary.attachment_ids.is_empty());
        assert_eq!(summary.root_item, None);
    }

    #[test]
    fn test_missing_response_class_captures_nothing() {
        let xml = envelope(
            r#"<m:CreateItemResponse><m:ResponseMessages>
                 <m:CreateItemResponseMessage>
                   <m:ResponseCode>NoError</m:ResponseCode>
                   <m:Items><t:Message><t:ItemId Id="A1" ChangeKey="C1"/></t:Message></m:Items>
                 </m:CreateItemResponseMessage>
               </m:ResponseMessages></m:CreateItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Draft, &mut log).unwrap();
        assert_eq!(summary.item, None);
        assert!(log.iter().any(|e| e.message.contains("(no class)")));
    }

    #[test]
    fn test_deeper_item_ids_are_ignored() {
        let xml = envelope(
            r#"<m:CreateItemResponse><m:ResponseMessages>
                 <m:CreateItemResponseMessage ResponseClass="Success">
                   <m:Items><t:Message><t:Wrapper><t:ItemId Id="A1" ChangeKey="C1"/></t:Wrapper></t:Message></m:Items>
                 </m:CreateItemResponseMessage>
               </m:ResponseMessages></m:CreateItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        assert_eq!(parse_response(&xml, Stage::Draft, &mut log).unwrap().item, None);
    }

    #[test]
    fn test_wrong_stage_captures_nothing() {
        let xml = envelope(
            r#"<m:CreateItemResponse><m:ResponseMessages>
                 <m:CreateItemResponseMessage ResponseClass="Success">
                   <m:Items><t:Message><t:ItemId Id="A1" ChangeKey="C1"/></t:Message></m:Items>
                 </m:CreateItemResponseMessage>
               </m:ResponseMessages></m:CreateItemResponse>"#,
        );
        let mut log = Diagnostics::new("session");
        let summary = parse_response(&xml, Stage::Attachment, &mut log).unwrap();
        assert_eq!(summary, ResponseSummary::default());
    }

    #[test]
    fn test_fault() {
        let xml = envelope("<s:Fault><faultcode>s:Client</faultcode><faultstring>Bad request</faultstring></s:Fault>");
        let mut log = Diagnostics::new("session");
        parse_response(&xml, Stage::Draft, &mut log).unwrap();
        assert!(log.iter().any(|e| e.message == "SOAP fault: Bad request"));
    }

    #[test]
    fn test_unreadable_document() {
        let mut log = Diagnostics::new("session");
        assert!(parse_response("<oops", Stage::Draft, &mut log).is_err());
    }
}
