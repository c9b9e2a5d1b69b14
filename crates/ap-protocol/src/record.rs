use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rendered in place of a field the record does not carry.
pub const MISSING_PLACEHOLDER: &str = "—";

/// Logical inventory fields, resolved against sheet headers by alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    Brand,
    Model,
    Year,
    Price,
    Mileage,
    Gearbox,
    Engine,
    Body,
    Color,
}

impl RecordField {
    /// Header names accepted for this field (compared case-insensitively).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id", "артикул"],
            Self::Brand => &["марка", "brand", "make"],
            Self::Model => &["модель", "model"],
            Self::Year => &["год", "year"],
            Self::Price => &["цена", "price"],
            Self::Mileage => &["пробег", "mileage"],
            Self::Gearbox => &["кпп", "коробка", "трансмиссия", "gearbox", "transmission"],
            Self::Engine => &["двигатель", "топливо", "engine", "fuel"],
            Self::Body => &["кузов", "body", "body type"],
            Self::Color => &["цвет", "color", "colour"],
        }
    }

    fn accepts(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        self.aliases().iter().any(|a| *a == header)
    }
}

/// One inventory row: an ordered mapping from header to cell text.
///
/// Lookups never fail. Absent fields resolve to `None` (or the empty
/// string via [`Record::field_or_empty`]) so matching can fail closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(header, value)` pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append a field. A repeated header shadows nothing; the first one wins on lookup.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Look up a raw header (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.trim().to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| k.trim().to_lowercase() == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a logical field through its header aliases.
    pub fn field(&self, field: RecordField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| field.accepts(k))
            .map(|(_, v)| v.as_str())
    }

    pub fn field_or_empty(&self, field: RecordField) -> &str {
        self.field(field).unwrap_or("")
    }

    pub fn id(&self) -> Option<&str> {
        self.field(RecordField::Id)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All values joined by spaces and lowercased, for full-text matching.
    pub fn flattened_lowercase(&self) -> String {
        self.fields
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            record.push(key, text);
        }
        Ok(record)
    }
}
