// ── Core identity types ──
//
// RecordId and Record<F> form the foundation of every resource. The id is
// always server-assigned; client code never invents one for a remote table.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ── RecordId ────────────────────────────────────────────────────────

/// Server-assigned identifier for a record.
///
/// Serial-key tables and the in-memory backend hand out integers; hosted
/// tables with `gen_random_uuid()` hand out UUIDs. Anything else is kept
/// verbatim. Canonical numeric and UUID strings normalize to `Int` /
/// `Uuid` on read, so `"42"` and `42` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl RecordId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Uuid(_) | Self::Text(_) => None,
        }
    }

    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            Self::Int(_) | Self::Text(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self::Int(n),
            Raw::Text(s) => Self::from(s),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<Uuid> for RecordId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<&str> for RecordId {
    /// Only canonical spellings normalize: `"42"` is an integer but `"007"`
    /// and `"+7"` stay text, so the id sent back is the one received.
    fn from(s: &str) -> Self {
        if let Ok(n) = s.parse::<i64>() {
            if n.to_string() == s {
                return Self::Int(n);
            }
        }
        match Uuid::parse_str(s) {
            Ok(u) if u.hyphenated().to_string() == s => Self::Uuid(u),
            _ => Self::Text(s.to_owned()),
        }
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ── Record ──────────────────────────────────────────────────────────

/// One row of a resource: the server-assigned id plus the field set `F`,
/// flattened next to it in JSON (`{"id": 1, "nombre": "…", …}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Record<F> {
    pub fn new(id: impl Into<RecordId>, fields: F) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

// ── Fields ──────────────────────────────────────────────────────────

/// A field set that can be stored as a resource row.
///
/// Names the table it lives in by default and the column the list is
/// sorted by. Extra columns the server returns (e.g. `created_at`) are
/// ignored on read.
pub trait Fields:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Default table name.
    const RESOURCE: &'static str;

    /// Default server-side sort column for `list()`.
    const DEFAULT_ORDER: &'static str;

    /// Short human-readable label, used in CLI messages.
    fn label(&self) -> String;

    /// Seed rows for the in-memory backend.
    fn demo_catalog() -> Vec<Self> {
        Vec::new()
    }
}
