use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary/foreign key as returned by the REST endpoint.
///
/// Tables keyed by `bigint` come back as JSON numbers, tables keyed by
/// `uuid` as strings. The two forms never compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{}", v),
            RecordId::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        RecordId::Int(v)
    }
}

impl From<&str> for RecordId {
    fn from(v: &str) -> Self {
        RecordId::Text(v.to_string())
    }
}
