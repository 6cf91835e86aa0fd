//! Entity kinds served by the catalog API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Books,
    Authors,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Books, EntityKind::Authors];

    /// Collection name, also the default endpoint path and envelope key
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Books => "books",
            EntityKind::Authors => "authors",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" | "book" => Ok(EntityKind::Books),
            "authors" | "author" => Ok(EntityKind::Authors),
            other => Err(AppError::NotFound(format!("Unknown entity kind: {}", other))),
        }
    }
}
