//! Author model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::models::Record;

/// Author as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Create author request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAuthor {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validate and turn into the record posted by `EntityStore::add`
    pub fn into_record(self) -> AppResult<Record> {
        let author = Self {
            name: self.name.trim().to_string(),
        };
        author.validate()?;
        Record::from_serialize(&author)
    }
}

impl TryFrom<&Record> for Author {
    type Error = crate::error::AppError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        record.parse()
    }
}
