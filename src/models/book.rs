//! Book model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::models::Record;

/// Book as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub author_id: i64,
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(range(min = 1, message = "Year must be positive"))]
    pub year: i32,
    #[validate(range(min = 1, message = "Author id must be positive"))]
    pub author_id: i64,
}

impl NewBook {
    pub fn new(title: impl Into<String>, year: i32, author_id: i64) -> Self {
        Self {
            title: title.into(),
            year,
            author_id,
        }
    }

    /// Validate and turn into the record posted by `EntityStore::add`
    pub fn into_record(self) -> AppResult<Record> {
        let book = Self {
            title: self.title.trim().to_string(),
            ..self
        };
        book.validate()?;
        Record::from_serialize(&book)
    }
}

impl TryFrom<&Record> for Book {
    type Error = crate::error::AppError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        record.parse()
    }
}
