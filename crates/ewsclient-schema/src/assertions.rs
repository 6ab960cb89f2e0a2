//! Co-occurrence checks that the content model cannot express.

use crate::SchemaName;
use crate::namespace::{AUTODISCOVER_OUTLOOK_RESPONSE, AUTODISCOVER_REQUEST, MESSAGES, TYPES};
use crate::tree::Element;

pub fn check(root: &Element, schema: SchemaName) -> Vec<String> {
    let mut out = Vec::new();
    match schema {
        SchemaName::Messages => {
            response_messages(root, &mut out);
            request_attachments(root, &mut out);
        }
        SchemaName::AutodiscoverRequest => {
            for address in root
                .descendants()
                .into_iter()
                .filter(|e| e.is(AUTODISCOVER_REQUEST, "EMailAddress"))
            {
                if !address.trimmed_text().contains('@') {
                    out.push(format!(
                        "EMailAddress '{}' is not an email address",
                        address.trimmed_text()
                    ));
                }
            }
        }
        SchemaName::AutodiscoverResponse => {
            for account in root
                .descendants()
                .into_iter()
                .filter(|e| e.is(AUTODISCOVER_OUTLOOK_RESPONSE, "Account"))
            {
                if account
                    .child(AUTODISCOVER_OUTLOOK_RESPONSE, "Action")
                    .is_none()
                {
                    out.push("Account does not carry an Action".to_string());
                }
            }
        }
    }
    out
}

fn response_messages(root: &Element, out: &mut Vec<String>) {
    for message in root
        .descendants()
        .into_iter()
        .filter(|e| is_messages(e) && e.name.ends_with("ResponseMessage"))
    {
        if message.attribute("ResponseClass") == Some("Error")
            && message.child(MESSAGES, "ResponseCode").is_none()
        {
            out.push(format!(
                "m:{}: ResponseClass=\"Error\" requires a ResponseCode",
                message.name
            ));
        }

        for items in message.children_named(MESSAGES, "Items") {
            for item_id in items
                .descendants()
                .into_iter()
                .filter(|e| e.is(TYPES, "ItemId"))
            {
                if item_id.attribute("Id").is_none() || item_id.attribute("ChangeKey").is_none() {
                    out.push(format!(
                        "m:{}: t:ItemId must carry both Id and ChangeKey",
                        message.name
                    ));
                }
            }
        }
    }
}

fn request_attachments(root: &Element, out: &mut Vec<String>) {
    for request in root
        .descendants()
        .into_iter()
        .filter(|e| e.is(MESSAGES, "CreateAttachment"))
    {
        for attachments in request.children_named(MESSAGES, "Attachments") {
            for (position, attachment) in attachments
                .children_named(TYPES, "FileAttachment")
                .enumerate()
            {
                for field in ["Name", "Content"] {
                    if attachment.child(TYPES, field).is_none() {
                        out.push(format!(
                            "m:CreateAttachment: t:FileAttachment #{} has no t:{field}",
                            position + 1
                        ));
                    }
                }
            }
        }
    }
}

fn is_messages(element: &Element) -> bool {
    element.namespace.as_deref() == Some(MESSAGES)
}
