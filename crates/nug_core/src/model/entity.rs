//! Generic attribute entity decoded from admin-protocol records.
//!
//! # Responsibility
//! - Decode a `RawRecord` into a typed attribute bag with multi-value
//!   coalescing and boolean token coercion.
//! - Provide dynamic get/set and flattening to an ordered JSON mapping.
//!
//! # Invariants
//! - `id` and `name` are always the first two attributes.
//! - A key seen once is stored as `Text`; the second occurrence promotes it
//!   to a `List` and appends, in source order.
//! - Only the exact tokens `TRUE`/`FALSE` become flags. A flag token replaces
//!   whatever the key held before; no numeric coercion ever happens.
//! - `id` never changes after construction.

use crate::model::record::RawRecord;
use crate::model::resource::ResourceKind;
use crate::model::validation::{ValidationError, Validator};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attribute key that mirrors the entity id.
pub const ID_KEY: &str = "id";
/// Attribute key that mirrors the entity name.
pub const NAME_KEY: &str = "name";
/// Key of the derived link object attached to responses; never remote state.
pub const SUBRESOURCES_KEY: &str = "subresources";

const TRUE_TOKEN: &str = "TRUE";
const FALSE_TOKEN: &str = "FALSE";

/// Plain ordered mapping handed to the boundary layer.
pub type Mapping = Map<String, Value>;

/// One decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }

    /// All string values, with a flag rendered as its wire token.
    pub fn texts(&self) -> Vec<String> {
        match self {
            Self::Flag(value) => vec![flag_token(*value).to_string()],
            Self::Text(value) => vec![value.clone()],
            Self::List(values) => values.clone(),
        }
    }

    /// Returns `true` for an empty text or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Flag(_) => false,
            Self::Text(value) => value.trim().is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Flag(value) => Value::Bool(*value),
            Self::Text(value) => Value::String(value.clone()),
            Self::List(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Failure to turn a raw record or request payload into an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    MissingId,
    MissingName,
    UnsupportedValue { key: String },
    Xml(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId => write!(f, "record has no id"),
            Self::MissingName => write!(f, "record has no name"),
            Self::UnsupportedValue { key } => {
                write!(f, "attribute `{key}` holds an unsupported value type")
            }
            Self::Xml(details) => write!(f, "malformed admin response: {details}"),
        }
    }
}

impl Error for DecodeError {}

/// Typed attribute record shared by domains, classes of service and accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntity {
    id: String,
    name: String,
    attributes: Vec<(String, AttributeValue)>,
}

impl AttributeEntity {
    /// Creates an entity holding only its identity attributes.
    ///
    /// Candidates built for a create call carry an empty `id`; the remote
    /// service assigns the real one.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        Self {
            attributes: vec![
                (ID_KEY.to_string(), AttributeValue::Text(id.clone())),
                (NAME_KEY.to_string(), AttributeValue::Text(name.clone())),
            ],
            id,
            name,
        }
    }

    /// Decodes one raw admin-protocol record.
    ///
    /// # Errors
    /// - `MissingId` / `MissingName` when either identity field is absent.
    pub fn decode(record: &RawRecord) -> Result<Self, DecodeError> {
        let id = record.id.as_deref().ok_or(DecodeError::MissingId)?;
        let name = record.name.as_deref().ok_or(DecodeError::MissingName)?;

        let mut entity = Self::new(id, name);
        for (key, text) in &record.attributes {
            entity.push_wire_value(key, text);
        }
        Ok(entity)
    }

    /// Builds a candidate entity from a decoded JSON request body.
    ///
    /// Strings become text, booleans flags, arrays of strings lists and
    /// numbers their decimal text. `null` members and the derived
    /// `subresources` object are skipped, so a read response can be sent
    /// back as an update body.
    ///
    /// # Errors
    /// - `MissingName` when `name` is absent or not a string.
    /// - `UnsupportedValue` for objects, mixed arrays or a non-string `id`.
    pub fn from_payload(payload: &Mapping) -> Result<Self, DecodeError> {
        let name = match payload.get(NAME_KEY) {
            Some(Value::String(name)) => name.as_str(),
            _ => return Err(DecodeError::MissingName),
        };
        let id = match payload.get(ID_KEY) {
            None | Some(Value::Null) => "",
            Some(Value::String(id)) => id.as_str(),
            Some(_) => {
                return Err(DecodeError::UnsupportedValue {
                    key: ID_KEY.to_string(),
                })
            }
        };

        let mut entity = Self::new(id, name);
        for (key, value) in payload {
            if key == ID_KEY || key == NAME_KEY || key == SUBRESOURCES_KEY {
                continue;
            }
            let decoded = match value {
                Value::Null => continue,
                Value::Bool(flag) => AttributeValue::Flag(*flag),
                Value::String(text) => AttributeValue::Text(text.clone()),
                Value::Number(number) => AttributeValue::Text(number.to_string()),
                Value::Array(items) => AttributeValue::List(
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| DecodeError::UnsupportedValue { key: key.clone() })?,
                ),
                Value::Object(_) => {
                    return Err(DecodeError::UnsupportedValue { key: key.clone() })
                }
            };
            entity.set(key.as_str(), decoded);
        }
        Ok(entity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up one attribute; `None` is the "no value" sentinel.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.position(key).map(|index| &self.attributes[index].1)
    }

    /// Looks up one attribute when it holds a single text value.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_text)
    }

    pub fn has(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Sets one attribute in memory only.
    ///
    /// New keys are appended after existing ones. Setting `name` to a text
    /// value also renames the entity. `id` is immutable and writes to it are
    /// ignored.
    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        let value = value.into();
        if key == ID_KEY {
            warn!("event=attribute_set module=model status=ignored key=id entity={}", self.id);
            return;
        }
        if key == NAME_KEY {
            if let AttributeValue::Text(name) = &value {
                self.name = name.clone();
            }
        }
        match self.position(key) {
            Some(index) => self.attributes[index].1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// All known attribute keys in declaration order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Flattens the entity into an ordered plain mapping.
    pub fn to_mapping(&self) -> Mapping {
        self.attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect()
    }

    /// Encodes the non-identity attributes back into wire pairs.
    ///
    /// Flags become `TRUE`/`FALSE` and lists become repeated keys.
    pub fn to_raw_pairs(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .filter(|(key, _)| key != ID_KEY && key != NAME_KEY)
            .flat_map(|(key, value)| value.texts().into_iter().map(move |text| (key.clone(), text)))
            .collect()
    }

    /// Runs `validator` against this entity as a `kind` resource.
    ///
    /// # Errors
    /// - `ValidationError` listing every violation when any rule fails.
    pub fn validate(
        &self,
        kind: ResourceKind,
        validator: &dyn Validator,
    ) -> Result<(), ValidationError> {
        let violations = validator.check(kind, self);
        if violations.is_empty() {
            return Ok(());
        }
        Err(ValidationError::new(kind, violations))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.attributes.iter().position(|(existing, _)| existing == key)
    }

    fn push_wire_value(&mut self, key: &str, text: &str) {
        let flag = match text {
            TRUE_TOKEN => Some(true),
            FALSE_TOKEN => Some(false),
            _ => None,
        };

        let Some(index) = self.position(key) else {
            let value = match flag {
                Some(flag) => AttributeValue::Flag(flag),
                None => AttributeValue::Text(text.to_string()),
            };
            self.attributes.push((key.to_string(), value));
            return;
        };

        let slot = &mut self.attributes[index].1;
        if let Some(flag) = flag {
            *slot = AttributeValue::Flag(flag);
            return;
        }
        match slot {
            AttributeValue::List(values) => values.push(text.to_string()),
            other => {
                let mut values = other.texts();
                values.push(text.to_string());
                *other = AttributeValue::List(values);
            }
        }
    }
}

impl Display for AttributeEntity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

fn flag_token(value: bool) -> &'static str {
    if value {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeEntity, AttributeValue, DecodeError};
    use crate::model::record::RawRecord;
    use serde_json::json;

    #[test]
    fn repeated_key_promotes_scalar_to_list_on_second_occurrence() {
        let record = RawRecord::new("a1", "alice@example.com")
            .with_attr("zimbraMailAlias", "al@example.com")
            .with_attr("zimbraMailAlias", "ally@example.com")
            .with_attr("zimbraMailAlias", "a@example.com");
        let entity = AttributeEntity::decode(&record).unwrap();

        assert_eq!(
            entity.get("zimbraMailAlias"),
            Some(&AttributeValue::List(vec![
                "al@example.com".to_string(),
                "ally@example.com".to_string(),
                "a@example.com".to_string(),
            ]))
        );
    }

    #[test]
    fn flag_token_replaces_previous_value() {
        let record = RawRecord::new("a1", "alice")
            .with_attr("zimbraFeatureMailEnabled", "yes")
            .with_attr("zimbraFeatureMailEnabled", "FALSE");
        let entity = AttributeEntity::decode(&record).unwrap();
        assert_eq!(
            entity.get("zimbraFeatureMailEnabled"),
            Some(&AttributeValue::Flag(false))
        );
    }

    #[test]
    fn text_after_flag_keeps_flag_token_in_list() {
        let record = RawRecord::new("a1", "alice")
            .with_attr("mixed", "TRUE")
            .with_attr("mixed", "maybe");
        let entity = AttributeEntity::decode(&record).unwrap();
        assert_eq!(
            entity.get("mixed"),
            Some(&AttributeValue::List(vec![
                "TRUE".to_string(),
                "maybe".to_string()
            ]))
        );
    }

    #[test]
    fn tokens_are_case_sensitive_and_numbers_stay_text() {
        let record = RawRecord::new("c1", "default")
            .with_attr("lower", "true")
            .with_attr("quota", "1024");
        let entity = AttributeEntity::decode(&record).unwrap();
        assert_eq!(entity.get_text("lower"), Some("true"));
        assert_eq!(entity.get_text("quota"), Some("1024"));
    }

    #[test]
    fn set_on_id_is_ignored_and_set_on_name_renames() {
        let mut entity = AttributeEntity::new("d1", "example.com");
        entity.set("id", "other");
        entity.set("name", "example.org");

        assert_eq!(entity.id(), "d1");
        assert_eq!(entity.to_string(), "example.org");
        assert_eq!(entity.get_text("name"), Some("example.org"));
    }

    #[test]
    fn raw_pairs_expand_lists_and_encode_flags() {
        let mut entity = AttributeEntity::new("a1", "alice");
        entity.set("enabled", true);
        entity.set("alias", vec!["x".to_string(), "y".to_string()]);

        assert_eq!(
            entity.to_raw_pairs(),
            vec![
                ("enabled".to_string(), "TRUE".to_string()),
                ("alias".to_string(), "x".to_string()),
                ("alias".to_string(), "y".to_string()),
            ]
        );
    }

    #[test]
    fn payload_rejects_nested_objects() {
        let payload = json!({"name": "example.com", "nested": {"a": 1}});
        let err = AttributeEntity::from_payload(payload.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedValue {
                key: "nested".to_string()
            }
        );
    }
}
