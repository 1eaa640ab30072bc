//! JSON form of parsed plans
//!
//! Records derive their field layout; change kinds are mapped explicitly to
//! their lowercase tag (`"create"`, `"no-op"`, ...) so the wire form does not
//! follow the Rust variant names.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::types::{ChangeKind, PlanSummary};
use crate::error::ReviewError;

impl Serialize for ChangeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChangeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        ChangeKind::from_tag(&tag)
            .ok_or_else(|| de::Error::custom(format!("unknown change kind '{}'", tag)))
    }
}

/// Encode a summary as a JSON document
pub fn to_json(summary: &PlanSummary, pretty: bool) -> Result<String, ReviewError> {
    let text = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };
    Ok(text)
}

/// Decode a summary from a JSON document produced by [`to_json`]
pub fn from_json(text: &str) -> Result<PlanSummary, ReviewError> {
    Ok(serde_json::from_str(text)?)
}
