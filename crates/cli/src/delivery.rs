//! Filesystem delivery transport.
//!
//! Writes finished artifacts into an output directory; the recipient is
//! logged so a future mail transport can take over the same trait without
//! changing the runner.

use std::path::PathBuf;

use async_trait::async_trait;
use reporter_client::{Delivery, DeliveryError};
use tracing::info;

/// Delivers artifacts as `<sanitized subject>.pdf` files in a directory.
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn artifact_path(&self, subject: &str) -> PathBuf {
        self.dir.join(format!("{}.pdf", sanitize_subject(subject)))
    }
}

/// Reduce a subject line to a safe file stem.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`; an empty subject falls
/// back to `report`.
fn sanitize_subject(subject: &str) -> String {
    let stem: String = subject
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "report".to_string()
    } else {
        stem
    }
}

#[async_trait]
impl Delivery for DirectoryDelivery {
    async fn deliver(
        &self,
        recipient: &str,
        subject: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<(), DeliveryError> {
        let Some(bytes) = attachment else {
            info!(recipient, subject, "nothing to write, delivery had no attachment");
            return Ok(());
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DeliveryError::new(recipient, format!("create output dir: {e}")))?;

        let path = self.artifact_path(subject);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DeliveryError::new(recipient, format!("write {}: {e}", path.display())))?;
        info!(recipient, path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(())
    }
}
