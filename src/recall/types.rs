//! Core recall type definitions.
//!
//! Defines [`AccessKind`] (how a file operation touched a memory item),
//! [`Recommendation`] (a related item surfaced to the caller) and the
//! [`CoVisitGraph`] shape shared by the index and its persisted document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nested adjacency map: path -> (neighbor path -> co-visit count).
///
/// `BTreeMap` keeps the persisted document ordered, so saves of equal graphs
/// produce identical bytes.
pub type CoVisitGraph = BTreeMap<String, BTreeMap<String, u64>>;

/// How a memory item was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// The item's content was returned to the caller (`view`).
    Read,
    /// The item was created or modified (`create`, `str_replace`, `insert`).
    Write,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccessKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            _ => Err(format!("unknown access kind: {s}")),
        }
    }
}

/// A memory item associated with the one just read. Carries no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Root-relative path of the related item.
    pub path: String,
    /// Number of sessions in which both items were touched.
    pub count: u64,
}
