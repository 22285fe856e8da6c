/*!
    Bucket listings.

    The object store itself is reached through [`ObjectLister`]; this module
    only narrows its output down to master manifests and turns keys into
    playable URLs.
*/

mod json;

use stream_types::ListingEntry;
use tracing::{error, info};

use crate::error::ListingError;
use crate::settings::BucketSettings;

pub use json::JsonListing;

/// Region used for public URLs when none is given.
pub const DEFAULT_REGION: &str = "eu-west-1";

const MASTER_MARKER: &str = "master";

/**
    Source of bucket listings.
*/
pub trait ObjectLister {
    fn list(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ListingEntry>, ListingError>;
}

/**
    A listed object with everything needed to present and play it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub entry: ListingEntry,
    pub url: String,
}

impl ListedObject {
    pub fn new(entry: ListingEntry, bucket: &str, region: &str) -> Self {
        let url = public_url(bucket, region, &entry.key);
        Self { entry, url }
    }

    pub fn key(&self) -> &str {
        &self.entry.key
    }

    /// The first path segment, which names the show the object belongs to.
    pub fn title(&self) -> &str {
        match self.entry.key.split('/').next() {
            Some(first) if !first.is_empty() => first,
            _ => "Unknown File",
        }
    }

    pub fn file_name(&self) -> &str {
        self.entry.key.rsplit('/').next().unwrap_or(&self.entry.key)
    }

    /// Only video files can be opened for playback.
    pub fn is_video(&self) -> bool {
        let name = self.file_name().to_ascii_lowercase();
        name.ends_with(".m3u8") || name.ends_with(".mp4")
    }
}

/**
    Build the public URL of an object.
*/
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/**
    Keep entries whose key names a master manifest and contains `search`.
    Both comparisons ignore case.
*/
pub fn find_masters(entries: Vec<ListingEntry>, search: &str) -> Vec<ListingEntry> {
    let search = search.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| {
            let key = entry.key.to_lowercase();
            key.contains(MASTER_MARKER) && key.contains(&search)
        })
        .collect()
}

/**
    List the bucket and return its master manifests.

    Listing failures are logged and produce an empty result.
*/
pub fn list_masters(
    lister: &dyn ObjectLister,
    settings: &BucketSettings,
    prefix: Option<&str>,
    search: &str,
    region: &str,
) -> Vec<ListedObject> {
    let entries = match lister.list(&settings.bucket, prefix) {
        Ok(entries) => entries,
        Err(e) => {
            error!("failed to list bucket '{}': {}", settings.bucket, e);
            return Vec::new();
        }
    };

    let total = entries.len();
    let masters: Vec<ListedObject> = find_masters(entries, search)
        .into_iter()
        .map(|entry| ListedObject::new(entry, &settings.bucket, region))
        .collect();

    info!(total, matched = masters.len(), "listed bucket '{}'", settings.bucket);
    masters
}
