//! Documents and document paths.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::PathError;

/// Field map of a document.
pub type Fields = Map<String, Value>;

/// Location of a document: `Collection/id`.
///
/// # Examples
///
/// ```
/// use billwise_rules::DocumentPath;
///
/// let path: DocumentPath = "Bills/testBill".parse().unwrap();
/// assert_eq!(path.collection(), "Bills");
/// assert_eq!(path.id(), "testBill");
/// assert_eq!(path.to_string(), "Bills/testBill");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    collection: String,
    id: String,
}

impl DocumentPath {
    /// Builds a path from its two segments.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if a segment is empty or contains `/`.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self, PathError> {
        let collection = collection.into();
        let id = id.into();
        let rejoined = format!("{}/{}", collection, id);

        if collection.is_empty() || id.is_empty() {
            return Err(PathError {
                path: rejoined,
                reason: "segments must not be empty",
            });
        }
        if collection.contains('/') || id.contains('/') {
            return Err(PathError {
                path: rejoined,
                reason: "expected exactly two segments",
            });
        }

        Ok(Self { collection, id })
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the document id within its collection.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl FromStr for DocumentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((collection, id)) => Self::new(collection, id).map_err(|e| PathError {
                path: s.to_string(),
                reason: e.reason,
            }),
            None => Err(PathError {
                path: s.to_string(),
                reason: "expected Collection/id",
            }),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A stored record, such as a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: DocumentPath,
    fields: Fields,
}

impl Document {
    /// Creates a document at `path` holding `fields`.
    pub fn new(path: DocumentPath, fields: Fields) -> Self {
        Self { path, fields }
    }

    /// Returns the document's path.
    pub fn path(&self) -> &DocumentPath {
        &self.path
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns a single field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Reads the owner id from `owner_field`.
    ///
    /// Returns `None` if the field is missing or not a string.
    pub fn owner_id(&self, owner_field: &str) -> Option<&str> {
        owner_of(&self.fields, owner_field)
    }
}

pub(crate) fn owner_of<'a>(fields: &'a Fields, owner_field: &str) -> Option<&'a str> {
    fields.get(owner_field).and_then(Value::as_str)
}
