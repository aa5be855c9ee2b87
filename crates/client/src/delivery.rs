//! Delivery collaborator contract.
//!
//! The pipeline ends by handing a finished artifact to a [`Delivery`]
//! implementation: destination address, subject line, optional attachment
//! bytes. Transports (mail, filesystem, object storage) live outside this
//! crate; the runner only needs success or failure.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a delivery transport.
#[derive(Debug, Error)]
#[error("to {recipient}: {message}")]
pub struct DeliveryError {
    pub recipient: String,
    pub message: String,
}

impl DeliveryError {
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            message: message.into(),
        }
    }
}

/// A destination for finished report artifacts.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Hand over one artifact.
    ///
    /// The subject carries the dashboard title; `attachment` is `None` when
    /// a transport is asked to notify without bytes.
    async fn deliver(
        &self,
        recipient: &str,
        subject: &str,
        attachment: Option<Vec<u8>>,
    ) -> Result<(), DeliveryError>;
}
