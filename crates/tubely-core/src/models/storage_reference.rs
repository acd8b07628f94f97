use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::STORAGE_REFERENCE_SEPARATOR;
use crate::error::AppError;

/// Location of a stored object, persisted as `"<bucket>,<key>"`.
///
/// Neither part may be empty or contain the separator, so every value produced by
/// [`StorageReference::new`] round-trips through [`StorageReference::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageReference {
    bucket: String,
    key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, AppError> {
        let bucket = bucket.into();
        let key = key.into();

        for (name, part) in [("bucket", &bucket), ("key", &key)] {
            if part.is_empty() {
                return Err(AppError::Format(format!("Storage {} is empty", name)));
            }
            if part.contains(STORAGE_REFERENCE_SEPARATOR) {
                return Err(AppError::Format(format!(
                    "Storage {} contains the reference separator: {}",
                    name, part
                )));
            }
        }

        Ok(Self { bucket, key })
    }

    /// Parse a persisted reference. Anything other than exactly two non-empty
    /// parts is a `Format` error.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let parts: Vec<&str> = value.split(STORAGE_REFERENCE_SEPARATOR).collect();
        match parts.as_slice() {
            [bucket, key] if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket: (*bucket).to_string(),
                key: (*key).to_string(),
            }),
            _ => Err(AppError::Format(format!(
                "Expected \"<bucket>,<key>\", got {:?}",
                value
            ))),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, STORAGE_REFERENCE_SEPARATOR, self.key)
    }
}

impl FromStr for StorageReference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
