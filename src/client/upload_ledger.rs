use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::modules::image_host::UploadedImage;

/// Image uploaded to the host but not yet referenced by a saved banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub file_name: String,
    pub secure_url: String,
    pub public_id: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Tracks uploads between the image host call and the banner save.
///
/// An entry is recorded right after a successful upload and settled once a
/// banner referencing its URL is persisted. Whatever remains are orphans on
/// the image host.
#[derive(Debug, Clone, Default)]
pub struct UploadLedger {
    entries: Arc<Mutex<Vec<PendingUpload>>>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingUpload>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, file_name: &str, uploaded: &UploadedImage) {
        debug!("Recording pending upload {}", uploaded.secure_url);
        self.lock().push(PendingUpload {
            file_name: file_name.to_string(),
            secure_url: uploaded.secure_url.clone(),
            public_id: uploaded.public_id.clone(),
            uploaded_at: Utc::now(),
        });
    }

    /// Mark the upload behind `secure_url` as referenced; `false` if it was not pending
    pub fn settle(&self, secure_url: &str) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.secure_url != secure_url);
        before != entries.len()
    }

    pub fn orphans(&self) -> Vec<PendingUpload> {
        self.lock().clone()
    }

    /// Remove and return every unsettled upload, e.g. to delete them on the host
    pub fn take_orphans(&self) -> Vec<PendingUpload> {
        let orphans = std::mem::take(&mut *self.lock());
        if !orphans.is_empty() {
            warn!("{} uploaded image(s) were never attached to a banner", orphans.len());
        }
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded(url: &str) -> UploadedImage {
        UploadedImage {
            secure_url: url.to_string(),
            public_id: Some("banners/x".to_string()),
        }
    }

    #[test]
    fn test_settled_uploads_are_not_orphans() {
        let ledger = UploadLedger::new();
        ledger.record("a.png", &uploaded("https://cdn/a.png"));
        ledger.record("b.png", &uploaded("https://cdn/b.png"));

        assert!(ledger.settle("https://cdn/a.png"));
        assert!(!ledger.settle("https://cdn/a.png"));

        let orphans = ledger.orphans();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].file_name, "b.png");
    }

    #[test]
    fn test_take_orphans_empties_the_ledger() {
        let ledger = UploadLedger::new();
        ledger.record("a.png", &uploaded("https://cdn/a.png"));

        assert_eq!(ledger.take_orphans().len(), 1);
        assert!(ledger.orphans().is_empty());
    }
}
