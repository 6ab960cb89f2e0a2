//! Validation of representative EWS documents.

#![allow(clippy::unwrap_used)]

use ewsclient_schema::{SchemaName, Severity, validate};
use proptest::prelude::*;

const CREATE_ITEM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
               xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types"
               xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
  <soap:Body>
    <m:CreateItem MessageDisposition="SaveOnly">
      <m:SavedItemFolderId><t:DistinguishedFolderId Id="drafts"/></m:SavedItemFolderId>
      <m:Items>
        <t:Message>
          <t:ItemClass>IPM.Note</t:ItemClass>
          <t:Subject>Quarterly report</t:Subject>
          <t:Sensitivity>Normal</t:Sensitivity>
          <t:Body BodyType="Text">See attached.</t:Body>
          <t:Importance>High</t:Importance>
          <t:ToRecipients>
            <t:Mailbox><t:EmailAddress>alice@example.com</t:EmailAddress></t:Mailbox>
          </t:ToRecipients>
          <t:IsReadReceiptRequested>true</t:IsReadReceiptRequested>
          <t:From><t:Mailbox><t:EmailAddress>bob@example.com</t:EmailAddress></t:Mailbox></t:From>
        </t:Message>
      </m:Items>
    </m:CreateItem>
  </soap:Body>
</soap:Envelope>"#;

const CREATE_ITEM_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Header>
    <h:ServerVersionInfo xmlns:h="http://schemas.microsoft.com/exchange/services/2006/types" MajorVersion="15"/>
  </s:Header>
  <s:Body>
    <m:CreateItemResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages"
                          xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
      <m:ResponseMessages>
        <m:CreateItemResponseMessage ResponseClass="Success">
          <m:ResponseCode>NoError</m:ResponseCode>
          <m:Items><t:Message><t:ItemId Id="A1" ChangeKey="C1"/></t:Message></m:Items>
        </m:CreateItemResponseMessage>
      </m:ResponseMessages>
    </m:CreateItemResponse>
  </s:Body>
</s:Envelope>"#;

const AUTODISCOVER_REQUEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Autodiscover xmlns="http://schemas.microsoft.com/exchange/autodiscover/outlook/requestschema/2006">
  <Request>
    <EMailAddress>alice@example.com</EMailAddress>
    <AcceptableResponseSchema>http://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a</AcceptableResponseSchema>
  </Request>
</Autodiscover>"#;

const AUTODISCOVER_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Autodiscover xmlns="http://schemas.microsoft.com/exchange/autodiscover/responseschema/2006">
  <Response xmlns="http://schemas.microsoft.com/exchange/autodiscover/outlook/responseschema/2006a">
    <User><DisplayName>Alice</DisplayName></User>
    <Account>
      <AccountType>email</AccountType>
      <Action>settings</Action>
      <Protocol><Type>EXCH</Type><Server>outlook.office365.com</Server></Protocol>
    </Account>
  </Response>
</Autodiscover>"#;

fn errors(document: &str, schema: SchemaName) -> Vec<String> {
    validate(document, Some(schema))
        .diagnostics
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .map(|d| d.message)
        .collect()
}

#[test]
fn test_create_item_request_is_valid() {
    let validation = validate(CREATE_ITEM, None);
    assert!(validation.valid, "{:?}", validation.diagnostics);
    assert_eq!(validation.diagnostics.len(), 1);
    assert_eq!(validation.diagnostics[0].severity, Severity::Info);
    assert!(validation.diagnostics[0].message.contains("messages.xsd"));
}

#[test]
fn test_create_item_response_is_valid() {
    let validation = validate(CREATE_ITEM_RESPONSE.as_bytes(), Some(SchemaName::Messages));
    assert!(validation.valid, "{:?}", validation.diagnostics);
}

#[test]
fn test_elements_out_of_order() {
    let swapped = CREATE_ITEM.replace(
        "<t:Subject>Quarterly report</t:Subject>\n          <t:Sensitivity>Normal</t:Sensitivity>",
        "<t:Sensitivity>Normal</t:Sensitivity>\n          <t:Subject>Quarterly report</t:Subject>",
    );
    let errors = errors(&swapped, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("unexpected element <t:Subject>")));
}

#[test]
fn test_enumeration_violations() {
    let bad = CREATE_ITEM
        .replace("<t:Importance>High</t:Importance>", "<t:Importance>Urgent</t:Importance>")
        .replace("BodyType=\"Text\"", "BodyType=\"Markdown\"");
    let errors = errors(&bad, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("'Urgent' is not one of")));
    assert!(errors.iter().any(|e| e.contains("attribute 'BodyType'")));
    assert!(errors.last().unwrap().contains("violation"));
}

#[test]
fn test_missing_items() {
    let bad = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
        xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
      <soap:Body><m:CreateItem MessageDisposition="SaveOnly"/></soap:Body>
    </soap:Envelope>"#;
    let errors = errors(bad, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("missing required element <m:Items>")));
}

#[test]
fn test_item_id_without_change_key() {
    let bad = CREATE_ITEM_RESPONSE.replace(r#" ChangeKey="C1""#, "");
    let errors = errors(&bad, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("both Id and ChangeKey")));
}

#[test]
fn test_error_response_requires_code() {
    let bad = CREATE_ITEM_RESPONSE
        .replace("ResponseClass=\"Success\"", "ResponseClass=\"Error\"")
        .replace("<m:ResponseCode>NoError</m:ResponseCode>", "<m:MessageText>denied</m:MessageText>");
    let errors = errors(&bad, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("requires a ResponseCode")));
}

#[test]
fn test_create_attachment_request() {
    let good = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
        xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types"
        xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
      <soap:Body>
        <m:CreateAttachment>
          <m:ParentItemId Id="A1" ChangeKey="C1"/>
          <m:Attachments>
            <t:FileAttachment><t:Name>a.txt</t:Name><t:Content>aGVsbG8=</t:Content></t:FileAttachment>
          </m:Attachments>
        </m:CreateAttachment>
      </soap:Body>
    </soap:Envelope>"#;
    assert!(validate(good, None).valid);

    let nameless = good.replace("<t:Name>a.txt</t:Name>", "");
    let errors = errors(&nameless, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("has no t:Name")));

    let garbage = good.replace("aGVsbG8=", "not base64!");
    assert!(!validate(garbage, None).valid);
}

#[test]
fn test_send_item_requires_save_flag() {
    let doc = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
        xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types"
        xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
      <soap:Body>
        <m:SendItem SaveItemToFolder="true">
          <m:ItemIds><t:ItemId Id="A1" ChangeKey="C1"/></m:ItemIds>
          <m:SavedItemFolderId><t:DistinguishedFolderId Id="sentitems"/></m:SavedItemFolderId>
        </m:SendItem>
      </soap:Body>
    </soap:Envelope>"#;
    assert!(validate(doc, None).valid);

    let missing = doc.replace(r#" SaveItemToFolder="true""#, "");
    let errors = errors(&missing, SchemaName::Messages);
    assert!(errors.iter().any(|e| e.contains("'SaveItemToFolder'")));
}

#[test]
fn test_soap_fault_is_valid() {
    let fault = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
      <s:Body>
        <s:Fault>
          <faultcode>s:Client</faultcode>
          <faultstring>The request failed schema validation</faultstring>
        </s:Fault>
      </s:Body>
    </s:Envelope>"#;
    assert!(validate(fault, None).valid);
}

#[test]
fn test_autodiscover_request() {
    assert!(validate(AUTODISCOVER_REQUEST, Some(SchemaName::AutodiscoverRequest)).valid);

    let bad = AUTODISCOVER_REQUEST.replace("alice@example.com", "alice");
    let errors = errors(&bad, SchemaName::AutodiscoverRequest);
    assert!(errors.iter().any(|e| e.contains("not an email address")));
}

#[test]
fn test_autodiscover_response() {
    let validation = validate(AUTODISCOVER_RESPONSE, Some(SchemaName::AutodiscoverResponse));
    assert!(validation.valid, "{:?}", validation.diagnostics);

    let generic = r#"<Autodiscover xmlns="http://schemas.microsoft.com/exchange/autodiscover/responseschema/2006">
      <Response><Error Time="10:00:00" Id="1"><ErrorCode>500</ErrorCode></Error></Response>
    </Autodiscover>"#;
    assert!(validate(generic, Some(SchemaName::AutodiscoverResponse)).valid);
}

#[test]
fn test_schema_mismatch() {
    let validation = validate(AUTODISCOVER_RESPONSE, Some(SchemaName::Messages));
    assert!(!validation.valid);
    assert!(validation.errors().count() >= 2);
}

#[test]
fn test_not_xml() {
    let validation = validate("<html><body>Sign in", None);
    assert!(!validation.valid);
    assert!(validation.diagnostics.iter().all(|d| d.severity == Severity::Error));
}

proptest! {
    #[test]
    fn prop_validator_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let validation = validate(&bytes, None);
        prop_assert!(!validation.diagnostics.is_empty());
    }

    #[test]
    fn prop_subject_text_is_accepted(subject in "[A-Za-z0-9 ,.!?-]{0,40}") {
        let doc = CREATE_ITEM.replace("Quarterly report", &subject);
        prop_assert!(validate(doc, None).valid);
    }
}
