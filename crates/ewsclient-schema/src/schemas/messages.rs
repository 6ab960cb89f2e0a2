//! SOAP envelope with the EWS operations used for composing and sending mail.

use super::boolean_attribute;
use crate::namespace::{MESSAGES as M, SOAP_ENVELOPE as S, TYPES as T};
use crate::rules::{AttributeRule, ElementRule, Particle, Term, TextRule};

const SENSITIVITY: &[&str] = &["Normal", "Personal", "Private", "Confidential"];
const IMPORTANCE: &[&str] = &["Low", "Normal", "High"];
const BODY_TYPE: &[&str] = &["Text", "HTML", "Best"];
const RESPONSE_CLASS: &[&str] = &["Success", "Warning", "Error"];
const DISPOSITION: &[&str] = &["SaveOnly", "SendOnly", "SendAndSaveCopy"];
const FOLDERS: &[&str] = &[
    "calendar",
    "contacts",
    "deleteditems",
    "drafts",
    "inbox",
    "journal",
    "notes",
    "outbox",
    "sentitems",
    "tasks",
    "msgfolderroot",
    "root",
    "junkemail",
    "searchfolders",
    "voicemail",
];

/// Envelope root.
pub static ENVELOPE: ElementRule = ElementRule::complex(S, "Envelope", &ENVELOPE_CHILDREN);
static ENVELOPE_CHILDREN: [Particle; 2] = [Particle::optional(&HEADER), Particle::required(&BODY)];
static HEADER: ElementRule = ElementRule::open(S, "Header");
static BODY: ElementRule = ElementRule::complex(S, "Body", &BODY_CHILDREN);
static BODY_CHILDREN: [Particle; 1] = [Particle::choice(&OPERATIONS)];
static OPERATIONS: [&ElementRule; 7] = [
    &CREATE_ITEM,
    &CREATE_ATTACHMENT,
    &SEND_ITEM,
    &CREATE_ITEM_RESPONSE,
    &CREATE_ATTACHMENT_RESPONSE,
    &SEND_ITEM_RESPONSE,
    &FAULT,
];

// Fault children are unqualified.
static FAULT: ElementRule = ElementRule::complex(S, "Fault", &FAULT_CHILDREN);
static FAULT_CHILDREN: [Particle; 4] = [
    Particle::required(&FAULT_CODE),
    Particle::required(&FAULT_STRING),
    Particle::optional(&FAULT_ACTOR),
    Particle::optional(&FAULT_DETAIL),
];
static FAULT_CODE: ElementRule = ElementRule::leaf("", "faultcode", TextRule::NonEmpty);
static FAULT_STRING: ElementRule = ElementRule::leaf("", "faultstring", TextRule::Any);
static FAULT_ACTOR: ElementRule = ElementRule::leaf("", "faultactor", TextRule::Any);
static FAULT_DETAIL: ElementRule = ElementRule::open("", "detail");

// Shared types

static ITEM_ID: ElementRule =
    ElementRule::leaf(T, "ItemId", TextRule::ElementOnly).with_attributes(&ID_AND_CHANGE_KEY);
static ID_AND_CHANGE_KEY: [AttributeRule; 2] = [
    AttributeRule::required("Id"),
    AttributeRule::optional("ChangeKey"),
];

static MAILBOX: ElementRule = ElementRule::complex(T, "Mailbox", &MAILBOX_CHILDREN);
static MAILBOX_CHILDREN: [Particle; 4] = [
    Particle::optional(&MAILBOX_NAME),
    Particle::required(&EMAIL_ADDRESS),
    Particle::optional(&ROUTING_TYPE),
    Particle::optional(&MAILBOX_TYPE),
];
static MAILBOX_NAME: ElementRule = ElementRule::leaf(T, "Name", TextRule::Any);
static EMAIL_ADDRESS: ElementRule = ElementRule::leaf(T, "EmailAddress", TextRule::NonEmpty);
static ROUTING_TYPE: ElementRule = ElementRule::leaf(T, "RoutingType", TextRule::NonEmpty);
static MAILBOX_TYPE: ElementRule = ElementRule::leaf(T, "MailboxType", TextRule::NonEmpty);

static SAVED_ITEM_FOLDER_ID: ElementRule =
    ElementRule::complex(M, "SavedItemFolderId", &FOLDER_CHOICE);
static FOLDER_CHOICE: [Particle; 1] = [Particle::choice(&FOLDER_IDS)];
static FOLDER_IDS: [&ElementRule; 2] = [&DISTINGUISHED_FOLDER_ID, &FOLDER_ID];
static DISTINGUISHED_FOLDER_ID: ElementRule =
    ElementRule::complex(T, "DistinguishedFolderId", &DISTINGUISHED_FOLDER_CHILDREN)
        .with_attributes(&DISTINGUISHED_FOLDER_ATTRIBUTES);
static DISTINGUISHED_FOLDER_CHILDREN: [Particle; 1] = [Particle::optional(&MAILBOX)];
static DISTINGUISHED_FOLDER_ATTRIBUTES: [AttributeRule; 2] = [
    AttributeRule::required("Id").one_of(FOLDERS),
    AttributeRule::optional("ChangeKey"),
];
static FOLDER_ID: ElementRule =
    ElementRule::leaf(T, "FolderId", TextRule::ElementOnly).with_attributes(&ID_AND_CHANGE_KEY);

// CreateItem

static CREATE_ITEM: ElementRule = ElementRule::complex(M, "CreateItem", &CREATE_ITEM_CHILDREN)
    .with_attributes(&CREATE_ITEM_ATTRIBUTES);
static CREATE_ITEM_ATTRIBUTES: [AttributeRule; 2] = [
    AttributeRule::optional("MessageDisposition").one_of(DISPOSITION),
    AttributeRule::optional("SendMeetingInvitations"),
];
static CREATE_ITEM_CHILDREN: [Particle; 2] = [
    Particle::optional(&SAVED_ITEM_FOLDER_ID),
    Particle::required(&REQUEST_ITEMS),
];
static REQUEST_ITEMS: ElementRule = ElementRule::complex(M, "Items", &REQUEST_ITEMS_CHILDREN);
static REQUEST_ITEMS_CHILDREN: [Particle; 1] = [Particle::at_least(&MESSAGE, 1)];

static MESSAGE: ElementRule = ElementRule::complex(T, "Message", &MESSAGE_CHILDREN);
static MESSAGE_CHILDREN: [Particle; 12] = [
    Particle::optional(&ITEM_CLASS),
    Particle::optional(&SUBJECT),
    Particle::optional(&SENSITIVITY_ELEMENT),
    Particle::optional(&MESSAGE_BODY),
    Particle::optional(&IMPORTANCE_ELEMENT),
    Particle::optional(&TO_RECIPIENTS),
    Particle::optional(&CC_RECIPIENTS),
    Particle::optional(&BCC_RECIPIENTS),
    Particle::optional(&READ_RECEIPT),
    Particle::optional(&DELIVERY_RECEIPT),
    Particle::optional(&FROM),
    Particle::optional(&IS_READ),
];
static ITEM_CLASS: ElementRule = ElementRule::leaf(T, "ItemClass", TextRule::NonEmpty);
static SUBJECT: ElementRule = ElementRule::leaf(T, "Subject", TextRule::Any);
static SENSITIVITY_ELEMENT: ElementRule =
    ElementRule::leaf(T, "Sensitivity", TextRule::Enumeration(SENSITIVITY));
static MESSAGE_BODY: ElementRule =
    ElementRule::leaf(T, "Body", TextRule::Any).with_attributes(&BODY_ATTRIBUTES);
static BODY_ATTRIBUTES: [AttributeRule; 1] = [AttributeRule::required("BodyType").one_of(BODY_TYPE)];
static IMPORTANCE_ELEMENT: ElementRule =
    ElementRule::leaf(T, "Importance", TextRule::Enumeration(IMPORTANCE));
static RECIPIENTS: [Particle; 1] = [Particle::at_least(&MAILBOX, 1)];
static TO_RECIPIENTS: ElementRule = ElementRule::complex(T, "ToRecipients", &RECIPIENTS);
static CC_RECIPIENTS: ElementRule = ElementRule::complex(T, "CcRecipients", &RECIPIENTS);
static BCC_RECIPIENTS: ElementRule = ElementRule::complex(T, "BccRecipients", &RECIPIENTS);
static READ_RECEIPT: ElementRule =
    ElementRule::leaf(T, "IsReadReceiptRequested", TextRule::Boolean);
static DELIVERY_RECEIPT: ElementRule =
    ElementRule::leaf(T, "IsDeliveryReceiptRequested", TextRule::Boolean);
static FROM: ElementRule = ElementRule::complex(T, "From", &FROM_CHILDREN);
static FROM_CHILDREN: [Particle; 1] = [Particle::required(&MAILBOX)];
static IS_READ: ElementRule = ElementRule::leaf(T, "IsRead", TextRule::Boolean);

// CreateAttachment

static CREATE_ATTACHMENT: ElementRule =
    ElementRule::complex(M, "CreateAttachment", &CREATE_ATTACHMENT_CHILDREN);
static CREATE_ATTACHMENT_CHILDREN: [Particle; 2] = [
    Particle::required(&PARENT_ITEM_ID),
    Particle::required(&REQUEST_ATTACHMENTS),
];
static PARENT_ITEM_ID: ElementRule =
    ElementRule::leaf(M, "ParentItemId", TextRule::ElementOnly).with_attributes(&ID_AND_CHANGE_KEY);
static REQUEST_ATTACHMENTS: ElementRule =
    ElementRule::complex(M, "Attachments", &REQUEST_ATTACHMENTS_CHILDREN);
static REQUEST_ATTACHMENTS_CHILDREN: [Particle; 1] = [Particle::at_least(&REQUEST_FILE_ATTACHMENT, 1)];
static REQUEST_FILE_ATTACHMENT: ElementRule =
    ElementRule::complex(T, "FileAttachment", &REQUEST_FILE_ATTACHMENT_CHILDREN);
static REQUEST_FILE_ATTACHMENT_CHILDREN: [Particle; 4] = [
    Particle::optional(&ATTACHMENT_NAME),
    Particle::optional(&CONTENT_TYPE),
    Particle::optional(&CONTENT_ID),
    Particle::optional(&CONTENT),
];
static ATTACHMENT_NAME: ElementRule = ElementRule::leaf(T, "Name", TextRule::Any);
static CONTENT_TYPE: ElementRule = ElementRule::leaf(T, "ContentType", TextRule::Any);
static CONTENT_ID: ElementRule = ElementRule::leaf(T, "ContentId", TextRule::Any);
static CONTENT: ElementRule = ElementRule::leaf(T, "Content", TextRule::Base64);

// SendItem

static SEND_ITEM: ElementRule = ElementRule::complex(M, "SendItem", &SEND_ITEM_CHILDREN)
    .with_attributes(&SEND_ITEM_ATTRIBUTES);
static SEND_ITEM_ATTRIBUTES: [AttributeRule; 1] = [boolean_attribute("SaveItemToFolder", true)];
static SEND_ITEM_CHILDREN: [Particle; 2] = [
    Particle::required(&ITEM_IDS),
    Particle::optional(&SAVED_ITEM_FOLDER_ID),
];
static ITEM_IDS: ElementRule = ElementRule::complex(M, "ItemIds", &ITEM_IDS_CHILDREN);
static ITEM_IDS_CHILDREN: [Particle; 1] = [Particle::at_least(&ITEM_ID, 1)];

// Responses

static RESPONSE_MESSAGE_ATTRIBUTES: [AttributeRule; 1] =
    [AttributeRule::required("ResponseClass").one_of(RESPONSE_CLASS)];
static MESSAGE_TEXT: ElementRule = ElementRule::leaf(M, "MessageText", TextRule::Any);
static RESPONSE_CODE: ElementRule = ElementRule::leaf(M, "ResponseCode", TextRule::NonEmpty);
static DESCRIPTIVE_LINK_KEY: ElementRule =
    ElementRule::leaf(M, "DescriptiveLinkKey", TextRule::Any);
static MESSAGE_XML: ElementRule = ElementRule::open(M, "MessageXml");

static CREATE_ITEM_RESPONSE: ElementRule =
    ElementRule::complex(M, "CreateItemResponse", &CREATE_ITEM_RESPONSE_CHILDREN);
static CREATE_ITEM_RESPONSE_CHILDREN: [Particle; 1] =
    [Particle::required(&CREATE_ITEM_RESPONSE_MESSAGES)];
static CREATE_ITEM_RESPONSE_MESSAGES: ElementRule =
    ElementRule::complex(M, "ResponseMessages", &CREATE_ITEM_RESPONSE_MESSAGES_CHILDREN);
static CREATE_ITEM_RESPONSE_MESSAGES_CHILDREN: [Particle; 1] =
    [Particle::at_least(&CREATE_ITEM_RESPONSE_MESSAGE, 1)];
static CREATE_ITEM_RESPONSE_MESSAGE: ElementRule = ElementRule::complex(
    M,
    "CreateItemResponseMessage",
    &CREATE_ITEM_RESPONSE_MESSAGE_CHILDREN,
)
.with_attributes(&RESPONSE_MESSAGE_ATTRIBUTES);
static CREATE_ITEM_RESPONSE_MESSAGE_CHILDREN: [Particle; 5] = [
    Particle::optional(&MESSAGE_TEXT),
    Particle::optional(&RESPONSE_CODE),
    Particle::optional(&DESCRIPTIVE_LINK_KEY),
    Particle::optional(&MESSAGE_XML),
    Particle::optional(&RESPONSE_ITEMS),
];
static RESPONSE_ITEMS: ElementRule = ElementRule::open(M, "Items");

static CREATE_ATTACHMENT_RESPONSE: ElementRule = ElementRule::complex(
    M,
    "CreateAttachmentResponse",
    &CREATE_ATTACHMENT_RESPONSE_CHILDREN,
);
static CREATE_ATTACHMENT_RESPONSE_CHILDREN: [Particle; 1] =
    [Particle::required(&CREATE_ATTACHMENT_RESPONSE_MESSAGES)];
static CREATE_ATTACHMENT_RESPONSE_MESSAGES: ElementRule = ElementRule::complex(
    M,
    "ResponseMessages",
    &CREATE_ATTACHMENT_RESPONSE_MESSAGES_CHILDREN,
);
static CREATE_ATTACHMENT_RESPONSE_MESSAGES_CHILDREN: [Particle; 1] =
    [Particle::at_least(&CREATE_ATTACHMENT_RESPONSE_MESSAGE, 1)];
static CREATE_ATTACHMENT_RESPONSE_MESSAGE: ElementRule = ElementRule::complex(
    M,
    "CreateAttachmentResponseMessage",
    &CREATE_ATTACHMENT_RESPONSE_MESSAGE_CHILDREN,
)
.with_attributes(&RESPONSE_MESSAGE_ATTRIBUTES);
static CREATE_ATTACHMENT_RESPONSE_MESSAGE_CHILDREN: [Particle; 5] = [
    Particle::optional(&MESSAGE_TEXT),
    Particle::optional(&RESPONSE_CODE),
    Particle::optional(&DESCRIPTIVE_LINK_KEY),
    Particle::optional(&MESSAGE_XML),
    Particle::optional(&RESPONSE_ATTACHMENTS),
];
static RESPONSE_ATTACHMENTS: ElementRule =
    ElementRule::complex(M, "Attachments", &RESPONSE_ATTACHMENTS_CHILDREN);
static RESPONSE_ATTACHMENTS_CHILDREN: [Particle; 1] = [Particle {
    term: Term::Choice(&RESPONSE_ATTACHMENT_KINDS),
    min: 0,
    max: None,
}];
static RESPONSE_ATTACHMENT_KINDS: [&ElementRule; 2] =
    [&RESPONSE_FILE_ATTACHMENT, &RESPONSE_ITEM_ATTACHMENT];
static RESPONSE_FILE_ATTACHMENT: ElementRule =
    ElementRule::complex(T, "FileAttachment", &RESPONSE_FILE_ATTACHMENT_CHILDREN);
static RESPONSE_FILE_ATTACHMENT_CHILDREN: [Particle; 5] = [
    Particle::required(&ATTACHMENT_ID),
    Particle::optional(&ATTACHMENT_NAME),
    Particle::optional(&CONTENT_TYPE),
    Particle::optional(&CONTENT_ID),
    Particle::optional(&CONTENT),
];
static ATTACHMENT_ID: ElementRule = ElementRule::leaf(T, "AttachmentId", TextRule::ElementOnly)
    .with_attributes(&ATTACHMENT_ID_ATTRIBUTES);
static ATTACHMENT_ID_ATTRIBUTES: [AttributeRule; 3] = [
    AttributeRule::required("Id"),
    AttributeRule::optional("RootItemId"),
    AttributeRule::optional("RootItemChangeKey"),
];
static RESPONSE_ITEM_ATTACHMENT: ElementRule = ElementRule::open(T, "ItemAttachment");

static SEND_ITEM_RESPONSE: ElementRule =
    ElementRule::complex(M, "SendItemResponse", &SEND_ITEM_RESPONSE_CHILDREN);
static SEND_ITEM_RESPONSE_CHILDREN: [Particle; 1] =
    [Particle::required(&SEND_ITEM_RESPONSE_MESSAGES)];
static SEND_ITEM_RESPONSE_MESSAGES: ElementRule =
    ElementRule::complex(M, "ResponseMessages", &SEND_ITEM_RESPONSE_MESSAGES_CHILDREN);
static SEND_ITEM_RESPONSE_MESSAGES_CHILDREN: [Particle; 1] =
    [Particle::at_least(&SEND_ITEM_RESPONSE_MESSAGE, 1)];
static SEND_ITEM_RESPONSE_MESSAGE: ElementRule = ElementRule::complex(
    M,
    "SendItemResponseMessage",
    &SEND_ITEM_RESPONSE_MESSAGE_CHILDREN,
)
.with_attributes(&RESPONSE_MESSAGE_ATTRIBUTES);
static SEND_ITEM_RESPONSE_MESSAGE_CHILDREN: [Particle; 4] = [
    Particle::optional(&MESSAGE_TEXT),
    Particle::optional(&RESPONSE_CODE),
    Particle::optional(&DESCRIPTIVE_LINK_KEY),
    Particle::optional(&MESSAGE_XML),
];
