use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stream_types::ListingEntry;
use tracing::debug;

use crate::error::ListingError;

use super::ObjectLister;

/**
    Accepted listing documents: a saved ListObjects response, or a bare
    array of entries.
*/
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingDocument {
    Entries(Vec<ListingEntry>),
    Response {
        #[serde(rename = "Name")]
        name: Option<String>,
        #[serde(rename = "Contents", default)]
        contents: Vec<ListingEntry>,
    },
}

/**
    Lists a bucket from a listing document saved on disk.
*/
#[derive(Debug, Clone)]
pub struct JsonListing {
    path: PathBuf,
}

impl JsonListing {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ObjectLister for JsonListing {
    fn list(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ListingEntry>, ListingError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ListingError::Read {
            path: self.path.clone(),
            source,
        })?;

        let entries = parse_listing(&contents, bucket)?;
        debug!(path = %self.path.display(), count = entries.len(), "read listing");

        Ok(match prefix {
            Some(prefix) => entries
                .into_iter()
                .filter(|e| e.key.starts_with(prefix))
                .collect(),
            None => entries,
        })
    }
}

fn parse_listing(contents: &str, bucket: &str) -> Result<Vec<ListingEntry>, ListingError> {
    match serde_json::from_str(contents)? {
        ListingDocument::Entries(entries) => Ok(entries),
        ListingDocument::Response { name, contents } => {
            if let Some(name) = name
                && name != bucket
            {
                return Err(ListingError::BucketMismatch {
                    expected: bucket.to_string(),
                    found: name,
                });
            }
            Ok(contents)
        }
    }
}
