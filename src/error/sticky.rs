use thiserror::Error;

use crate::error::store::StoreError;

/// Errors returned by sticky message commands.
///
/// Failures of the re-anchor itself are not errors; they are absorbed into the
/// sticky's error count and reported through `AnchorOutcome`.
#[derive(Error, Debug)]
pub enum StickyError {
    #[error("There is no sticky message in this channel")]
    NotConfigured,

    #[error("Sticky content must not be empty")]
    EmptyContent,

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),

    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
