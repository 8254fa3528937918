use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// MetadataValue – a single field of a subject's metadata record
// ---------------------------------------------------------------------------

/// A closed scalar variant for metadata fields.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "null"),
        }
    }
}

impl From<&JsonValue> for MetadataValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => MetadataValue::String(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    MetadataValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    MetadataValue::Float(f)
                } else {
                    MetadataValue::String(n.to_string())
                }
            }
            JsonValue::Bool(b) => MetadataValue::Bool(*b),
            JsonValue::Null => MetadataValue::Null,
            // Nested values are not expected; keep their JSON text.
            other => MetadataValue::String(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// SampleId – subject identifier with loose string/number equality
// ---------------------------------------------------------------------------

/// Subject identifier.
///
/// The dataset spells the same subject as `"940"` in `names`/`samples` and
/// as `940` in `metadata`. Ids are normalised on construction so that
/// numeric spellings (`"5"`, `5`, `5.0`, `" 5 "`) compare equal; anything
/// non-numeric compares by its trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(String);

impl SampleId {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return SampleId::from(i);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::from_number(v),
            _ => SampleId(trimmed.to_string()),
        }
    }

    fn from_number(v: f64) -> Self {
        if v.fract() == 0.0 && v.abs() < 1e15 {
            SampleId(format!("{}", v as i64))
        } else {
            SampleId(format!("{v}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SampleId {
    fn from(raw: &str) -> Self {
        SampleId::new(raw)
    }
}

impl From<String> for SampleId {
    fn from(raw: String) -> Self {
        SampleId::new(&raw)
    }
}

impl From<i64> for SampleId {
    fn from(v: i64) -> Self {
        SampleId(v.to_string())
    }
}

impl From<f64> for SampleId {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            SampleId::from_number(v)
        } else {
            SampleId(v.to_string())
        }
    }
}

impl<'de> Deserialize<'de> for SampleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(i) => SampleId::from(i),
            RawId::Float(f) => SampleId::from(f),
            RawId::Text(s) => SampleId::new(&s),
        })
    }
}

impl Serialize for SampleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Sample – one subject's OTU readings
// ---------------------------------------------------------------------------

/// OTU readings for one subject. The three sequences are index-aligned and
/// arrive sorted by `sample_values`, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: SampleId,
    pub otu_ids: Vec<i64>,
    pub otu_labels: Vec<String>,
    pub sample_values: Vec<f64>,
}

impl Sample {
    /// Number of OTU readings.
    pub fn len(&self) -> usize {
        self.otu_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.otu_ids.is_empty()
    }

    /// Whether the three parallel sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.otu_ids.len() == self.otu_labels.len()
            && self.otu_ids.len() == self.sample_values.len()
    }
}

// ---------------------------------------------------------------------------
// MetadataRecord – demographic record of one subject
// ---------------------------------------------------------------------------

/// Flat metadata record. Fields keep the order they had in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub id: SampleId,
    pub fields: Vec<(String, MetadataValue)>,
}

impl MetadataRecord {
    pub fn get(&self, field: &str) -> Option<&MetadataValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// `"key: value"` lines for the demographic panel, in field order.
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SamplesDataset – the complete belly-button document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SamplesDataset {
    /// Subject ids in dropdown order.
    pub names: Vec<SampleId>,
    pub metadata: Vec<MetadataRecord>,
    pub samples: Vec<Sample>,
}

impl SamplesDataset {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Earthquakes
// ---------------------------------------------------------------------------

/// One earthquake event.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeFeature {
    pub longitude: f64,
    pub latitude: f64,
    /// Hypocentre depth in km (third coordinate of the GeoJSON point).
    pub depth: f64,
    /// The USGS feed reports `null` for some events.
    pub magnitude: Option<f64>,
    pub place: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuakeCollection {
    pub title: Option<String>,
    pub features: Vec<QuakeFeature>,
}

impl QuakeCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Largest magnitude in the collection, ignoring missing values.
    pub fn max_magnitude(&self) -> Option<f64> {
        self.features
            .iter()
            .filter_map(|f| f.magnitude)
            .fold(None, |acc, m| Some(acc.map_or(m, |a: f64| a.max(m))))
    }
}

// ---------------------------------------------------------------------------
// Tectonic plates
// ---------------------------------------------------------------------------

/// One drawable boundary polyline as `[lon, lat]` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateLine {
    pub name: Option<String>,
    pub points: Vec<[f64; 2]>,
}

/// Plate boundary document. `raw` is kept untouched; `lines` is what gets
/// drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundaries {
    pub raw: JsonValue,
    pub lines: Vec<PlateLine>,
}
