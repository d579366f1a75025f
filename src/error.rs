use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::FrameId;
use crate::effects::Effect;

/// Result type alias for operations that may fail with [`PhotoboothError`].
pub type PhotoboothResult<T> = std::result::Result<T, PhotoboothError>;

/// Error types that can occur while compositing a transaction.
///
/// None of these are retried: every failure is deterministic for the same
/// inputs, so a retry would reproduce it.
#[derive(Debug, Error)]
pub enum PhotoboothError {
    /// The frame identifier has no entry in the layout catalog.
    #[error("Unknown frame: {frame_id}")]
    UnknownFrame { frame_id: String },
    /// Layout parameters do not fit the frame asset they are paired with.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// There are no photos to tile.
    #[error("Photo set is empty")]
    EmptyPhotoSet,
    /// Two buffers that must share dimensions do not.
    #[error("Image size {found:?} does not match expected size {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// A source photo could not be read or decoded.
    #[error("Failed to decode {}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The frame asset file is missing from the asset store.
    #[error("Frame asset not found: {}", path.display())]
    FrameAssetNotFound { path: PathBuf },
    /// The effect name is not understood by the effects provider.
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),
    /// The layout catalog document could not be parsed.
    #[error("Invalid layout catalog: {0}")]
    Catalog(#[from] serde_json::Error),
    /// Image encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A failure inside one effect directory, with the transaction context attached.
    #[error("Effect '{effect}' of transaction {transaction} (frame {frame_id}) failed")]
    Effect {
        transaction: String,
        effect: String,
        frame_id: String,
        #[source]
        source: Box<PhotoboothError>,
    },
    /// A failure shared by every effect of a transaction, such as an unreadable capture.
    #[error("Transaction {transaction} (frame {frame_id}) failed")]
    Transaction {
        transaction: String,
        frame_id: String,
        #[source]
        source: Box<PhotoboothError>,
    },
}

impl PhotoboothError {
    /// Strip any context wrappers and return the underlying error.
    pub fn root(&self) -> &PhotoboothError {
        match self {
            PhotoboothError::Effect { source, .. }
            | PhotoboothError::Transaction { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_effect(self, transaction: &str, effect: Effect, frame_id: &FrameId) -> Self {
        PhotoboothError::Effect {
            transaction: transaction.to_string(),
            effect: effect.to_string(),
            frame_id: frame_id.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_transaction(self, transaction: &str, frame_id: &FrameId) -> Self {
        PhotoboothError::Transaction {
            transaction: transaction.to_string(),
            frame_id: frame_id.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn geometry(message: impl Into<String>) -> Self {
        PhotoboothError::InvalidGeometry(message.into())
    }
}
