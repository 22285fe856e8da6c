use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SettingsError;

const APP_DIR: &str = "vidbrowser";
const SETTINGS_FILE: &str = "s3_settings.json";

/**
    Bucket name and credentials used to list media.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BucketSettings {
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl BucketSettings {
    pub fn new(
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /**
        Check that every field is filled in, reporting the first one that
        is not.
    */
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.bucket.trim().is_empty() {
            return Err(SettingsError::MissingBucket);
        }
        if self.access_key_id.trim().is_empty() {
            return Err(SettingsError::MissingAccessKeyId);
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(SettingsError::MissingSecretAccessKey);
        }
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty() && !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// The secret with all but its last four characters hidden.
    pub fn masked_secret(&self) -> String {
        let chars: Vec<char> = self.secret_access_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/**
    Location of the persisted settings record.
*/
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// The store in the platform's local data directory.
    pub fn new() -> Result<Self, SettingsError> {
        let dir = dirs::data_local_dir().ok_or(SettingsError::NoDataDir)?;
        Ok(Self::at(dir.join(APP_DIR).join(SETTINGS_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /**
        Read the stored settings. A missing or unreadable file yields empty
        settings.
    */
    pub fn load(&self) -> BucketSettings {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %self.path.display(), "no stored settings: {}", e);
                return BucketSettings::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "ignoring invalid settings file: {}", e);
            BucketSettings::default()
        })
    }

    pub fn save(&self, settings: &BucketSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_first_missing_field() {
        let settings = BucketSettings::new("  ", "", "");
        assert!(matches!(settings.validate(), Err(SettingsError::MissingBucket)));

        let settings = BucketSettings::new("media", " ", "");
        assert!(matches!(settings.validate(), Err(SettingsError::MissingAccessKeyId)));

        let settings = BucketSettings::new("media", "AKIA", "");
        let err = settings.validate().unwrap_err();
        assert_eq!(err.to_string(), "Secret Access Key is required");

        assert!(BucketSettings::new("media", "AKIA", "s3cr3t").validate().is_ok());
    }

    #[test]
    fn configured_only_when_complete() {
        assert!(!BucketSettings::default().is_configured());
        assert!(!BucketSettings::new("media", "AKIA", "").is_configured());
        assert!(BucketSettings::new("media", "AKIA", "s3cr3t").is_configured());
    }

    #[test]
    fn serialized_with_camel_case_fields() {
        let json = serde_json::to_value(BucketSettings::new("media", "AKIA", "s3cr3t")).unwrap();
        assert_eq!(json["bucket"], "media");
        assert_eq!(json["accessKeyId"], "AKIA");
        assert_eq!(json["secretAccessKey"], "s3cr3t");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join("nested").join(SETTINGS_FILE));

        let settings = BucketSettings::new("media", "AKIA", "s3cr3t");
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);

        let replaced = BucketSettings::new("archive", "AKIB", "other");
        store.save(&replaced).unwrap();
        assert_eq!(store.load(), replaced);
    }

    #[test]
    fn missing_or_invalid_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at(dir.path().join(SETTINGS_FILE));
        assert_eq!(store.load(), BucketSettings::default());

        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), BucketSettings::default());

        fs::write(store.path(), r#"{"bucket": "media"}"#).unwrap();
        let partial = store.load();
        assert_eq!(partial.bucket, "media");
        assert!(!partial.is_configured());
    }

    #[test]
    fn secret_masked() {
        assert_eq!(BucketSettings::new("b", "a", "abcdefgh").masked_secret(), "****efgh");
        assert_eq!(BucketSettings::new("b", "a", "abc").masked_secret(), "***");
    }
}
