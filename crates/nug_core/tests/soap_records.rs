use nug_core::{parse_records, AttributeEntity, AttributeValue, DecodeError, Domain, Resource};
use std::io::Write;

const GET_ALL_DOMAINS_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <GetAllDomainsResponse xmlns="urn:zimbraAdmin">
      <domain id="d1" name="example.com">
        <a n="zimbraDomainStatus">active</a>
        <a n="zimbraVirtualHostname">mail.example.com</a>
        <a n="zimbraVirtualHostname">webmail.example.com</a>
        <a n="zimbraFeatureGalEnabled">TRUE</a>
        <a n="description">Tom &amp; Jerry</a>
      </domain>
      <domain id="d2" name="example.org">
        <a n="zimbraDomainDefaultCOSId">c9</a>
        <a n="zimbraNotes"/>
      </domain>
    </GetAllDomainsResponse>
  </soap:Body>
</soap:Envelope>"#;

#[test]
fn parses_every_record_with_repeated_attributes_in_order() {
    let records = parse_records(GET_ALL_DOMAINS_RESPONSE, "domain").unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_deref(), Some("d1"));
    assert_eq!(records[0].name.as_deref(), Some("example.com"));
    assert_eq!(
        records[0].attributes,
        vec![
            ("zimbraDomainStatus".to_string(), "active".to_string()),
            ("zimbraVirtualHostname".to_string(), "mail.example.com".to_string()),
            ("zimbraVirtualHostname".to_string(), "webmail.example.com".to_string()),
            ("zimbraFeatureGalEnabled".to_string(), "TRUE".to_string()),
            ("description".to_string(), "Tom & Jerry".to_string()),
        ]
    );
    assert_eq!(
        records[1].attributes,
        vec![
            ("zimbraDomainDefaultCOSId".to_string(), "c9".to_string()),
            ("zimbraNotes".to_string(), String::new()),
        ]
    );
}

#[test]
fn parsed_records_decode_into_entities() {
    let records = parse_records(GET_ALL_DOMAINS_RESPONSE, "domain").unwrap();
    let first = AttributeEntity::decode(&records[0]).unwrap();

    assert_eq!(
        first.get("zimbraVirtualHostname"),
        Some(&AttributeValue::List(vec![
            "mail.example.com".to_string(),
            "webmail.example.com".to_string(),
        ]))
    );
    assert_eq!(first.get("zimbraFeatureGalEnabled"), Some(&AttributeValue::Flag(true)));

    let second = Domain::decode(&records[1]).unwrap();
    assert_eq!(second.default_cos_id(), Some("c9"));
}

#[test]
fn record_without_id_surfaces_as_decode_error() {
    let xml = r#"<GetAccountResponse><account name="alice@example.com"/></GetAccountResponse>"#;
    let records = parse_records(xml, "account").unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(
        AttributeEntity::decode(&records[0]).unwrap_err(),
        DecodeError::MissingId
    );
}

#[test]
fn other_elements_are_ignored() {
    let xml = r#"<GetCosResponse><server id="s1" name="mta"/><cos id="c1" name="default"/></GetCosResponse>"#;
    let records = parse_records(xml, "cos").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id.as_deref(), Some("c1"));
}

#[test]
fn mismatched_tags_are_rejected() {
    let err = parse_records("<r><domain id=\"d1\" name=\"x\"></r>", "domain").unwrap_err();
    assert!(matches!(err, DecodeError::Xml(_)));
}

#[test]
fn parses_response_saved_to_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(GET_ALL_DOMAINS_RESPONSE.as_bytes()).unwrap();

    let xml = std::fs::read_to_string(file.path()).unwrap();
    let records = parse_records(&xml, "domain").unwrap();
    assert_eq!(records.len(), 2);
}
