//! Persisted field records and their imagery annotation.
//!
//! A field's imagery is modelled as a single optional [`Imagery`] value so the
//! preview URL and capture date can only ever be present together. The wire
//! shape ([`FieldRecord`]) flattens it into two nullable keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub i64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a satellite scene covering a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imagery {
    /// Rendered preview URL of the scene
    pub url: String,
    /// Capture timestamp exactly as reported by the catalog
    pub date: String,
}

impl Imagery {
    pub fn new(url: impl Into<String>, date: impl Into<String>) -> Self {
        Self { url: url.into(), date: date.into() }
    }

    /// Rebuild imagery from its two nullable columns.
    ///
    /// Returns `None` unless both halves are present.
    pub fn from_columns(url: Option<String>, date: Option<String>) -> Option<Self> {
        match (url, date) {
            (Some(url), Some(date)) => Some(Self { url, date }),
            _ => None,
        }
    }
}

/// A field stored in the field store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "FieldRecord", from = "FieldRecord")]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    /// Canonical polygon WKT
    pub geom: String,
    pub imagery: Option<Imagery>,
}

impl Field {
    pub fn has_imagery(&self) -> bool {
        self.imagery.is_some()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.imagery.as_ref().map(|i| i.url.as_str())
    }

    pub fn image_date(&self) -> Option<&str> {
        self.imagery.as_ref().map(|i| i.date.as_str())
    }

    /// Return this field with its imagery replaced
    pub fn with_imagery(mut self, imagery: Imagery) -> Self {
        self.imagery = Some(imagery);
        self
    }
}

/// Flat serialization shape of a [`Field`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub id: FieldId,
    pub name: String,
    pub geom: String,
    pub image_url: Option<String>,
    pub image_date: Option<String>,
}

impl From<Field> for FieldRecord {
    fn from(field: Field) -> Self {
        let (image_url, image_date) = match field.imagery {
            Some(imagery) => (Some(imagery.url), Some(imagery.date)),
            None => (None, None),
        };

        Self {
            id: field.id,
            name: field.name,
            geom: field.geom,
            image_url,
            image_date,
        }
    }
}

impl From<FieldRecord> for Field {
    fn from(record: FieldRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            geom: record.geom,
            imagery: Imagery::from_columns(record.image_url, record.image_date),
        }
    }
}

/// A field that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewField {
    pub name: String,
    /// Polygon WKT handed to the store as-is
    pub geom: String,
    pub imagery: Option<Imagery>,
}

impl NewField {
    pub fn new(name: impl Into<String>, geom: impl Into<String>) -> Self {
        Self { name: name.into(), geom: geom.into(), imagery: None }
    }

    pub fn with_imagery(mut self, imagery: Option<Imagery>) -> Self {
        self.imagery = imagery;
        self
    }
}

/// Result of an insert attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion {
    /// The row was committed
    Inserted(Field),
    /// The row violated the unique name constraint and was rolled back
    Conflict { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_field() -> Field {
        Field {
            id: FieldId(7),
            name: "Rotterdam".to_string(),
            geom: "POLYGON ((0 0, 1 0, 1 1, 0 0))".to_string(),
            imagery: None,
        }
    }

    #[test]
    fn test_field_serializes_flat_nulls() {
        let json = serde_json::to_value(sample_field()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Rotterdam",
                "geom": "POLYGON ((0 0, 1 0, 1 1, 0 0))",
                "image_url": null,
                "image_date": null,
            })
        );
    }

    #[test]
    fn test_field_serializes_imagery_pair() {
        let field = sample_field().with_imagery(Imagery::new("mock_url", "mock_datetime"));
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["image_url"], "mock_url");
        assert_eq!(json["image_date"], "mock_datetime");
        assert_eq!(field.image_url(), Some("mock_url"));
        assert_eq!(field.image_date(), Some("mock_datetime"));
    }

    #[test]
    fn test_half_imagery_is_dropped() {
        assert!(Imagery::from_columns(Some("url".to_string()), None).is_none());
        assert!(Imagery::from_columns(None, Some("date".to_string())).is_none());

        let record = FieldRecord {
            id: FieldId(1),
            name: "a".to_string(),
            geom: "POLYGON ((0 0, 1 0, 1 1, 0 0))".to_string(),
            image_url: Some("url".to_string()),
            image_date: None,
        };
        let field: Field = record.into();
        assert!(!field.has_imagery());
    }
}
