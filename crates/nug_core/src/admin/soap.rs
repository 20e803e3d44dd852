//! Record extraction from admin SOAP response bodies.
//!
//! Responses list resources as `<domain id=".." name="..">` elements whose
//! `<a n="key">value</a>` children carry the attributes. Keys may repeat.
//! Namespace prefixes are ignored; quick-xml does not expand external
//! entities.

use crate::model::entity::DecodeError;
use crate::model::record::RawRecord;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const ATTRIBUTE_ELEMENT: &[u8] = b"a";
const ATTRIBUTE_KEY: &str = "n";
const RECORD_ID: &str = "id";
const RECORD_NAME: &str = "name";

/// Extracts every `element` record from an admin response document.
///
/// Records missing `id`/`name` are returned as-is; decoding reports them.
///
/// # Errors
/// - `DecodeError::Xml` when the document is malformed.
pub fn parse_records(xml: &str, element: &str) -> Result<Vec<RawRecord>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let element = element.as_bytes();

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    // Same-named elements nested inside a record are not records themselves.
    let mut nested = 0usize;
    let mut pending_key: Option<String> = None;
    let mut pending_text = String::new();

    loop {
        let event = reader.read_event().map_err(|err| {
            DecodeError::Xml(format!("at byte {}: {err}", reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => {
                let local = start.local_name();
                if local.as_ref() == element {
                    if current.is_some() {
                        nested += 1;
                    } else {
                        current = Some(start_record(&start)?);
                    }
                } else if current.is_some() && local.as_ref() == ATTRIBUTE_ELEMENT {
                    pending_key = Some(read_attr(&start, ATTRIBUTE_KEY)?.unwrap_or_default());
                    pending_text.clear();
                }
            }
            Event::Empty(start) => {
                let local = start.local_name();
                if current.is_none() && local.as_ref() == element {
                    records.push(start_record(&start)?);
                } else if local.as_ref() == ATTRIBUTE_ELEMENT {
                    if let Some(record) = current.as_mut() {
                        let key = read_attr(&start, ATTRIBUTE_KEY)?.unwrap_or_default();
                        record.push_attr(key, "");
                    }
                }
            }
            Event::Text(text) => {
                if pending_key.is_some() {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| DecodeError::Xml(err.to_string()))?;
                    pending_text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if pending_key.is_some() {
                    pending_text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(end) => {
                let local = end.local_name();
                if local.as_ref() == ATTRIBUTE_ELEMENT {
                    if let (Some(key), Some(record)) = (pending_key.take(), current.as_mut()) {
                        record.push_attr(key, std::mem::take(&mut pending_text));
                    }
                } else if local.as_ref() == element && current.is_some() {
                    if nested > 0 {
                        nested -= 1;
                    } else if let Some(record) = current.take() {
                        records.push(record);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(DecodeError::Xml("document ended inside a record".to_string()));
    }
    Ok(records)
}

fn start_record(start: &BytesStart<'_>) -> Result<RawRecord, DecodeError> {
    Ok(RawRecord {
        id: read_attr(start, RECORD_ID)?,
        name: read_attr(start, RECORD_NAME)?,
        attributes: Vec::new(),
    })
}

fn read_attr(start: &BytesStart<'_>, name: &str) -> Result<Option<String>, DecodeError> {
    let attr = start
        .try_get_attribute(name)
        .map_err(|err| DecodeError::Xml(err.to_string()))?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|err| DecodeError::Xml(err.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_records;
    use crate::model::entity::DecodeError;

    #[test]
    fn ignores_whitespace_between_attribute_elements() {
        let xml = r#"<GetCosResponse>
            <cos id="c1" name="default">
                <a n="zimbraMailQuota">0</a>
            </cos>
        </GetCosResponse>"#;
        let records = parse_records(xml, "cos").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].attributes,
            vec![("zimbraMailQuota".to_string(), "0".to_string())]
        );
    }

    #[test]
    fn truncated_document_is_rejected() {
        let err = parse_records(r#"<r><domain id="d1" name="x"><a n="k">v</a>"#, "domain")
            .unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
