//! Initial dataset loading.

use std::{io, path::Path};

use derive_more::{Display, Error, From};
use service::{
    command::{CreateListing, Payload},
    Command as _,
};
use tracerr::Traced;
use tracing as log;

use crate::{AsError as _, Service};

/// Loads the listings from the JSON file at the provided `path` into the
/// provided [`Service`].
///
/// Returns the number of loaded listings.
///
/// # Errors
///
/// See [`insert()`] for details, or if the file cannot be read.
pub async fn load(
    service: &Service,
    path: impl AsRef<Path>,
) -> Result<usize, Traced<LoadError>> {
    let path = path.as_ref();
    let raw = tokio::fs::read(path)
        .await
        .map_err(tracerr::from_and_wrap!(=> LoadError))?;

    let count = insert(service, &raw).await.map_err(tracerr::wrap!())?;
    log::info!("loaded {count} listings from `{}`", path.display());

    Ok(count)
}

/// Inserts the listings from the provided raw JSON array into the provided
/// [`Service`], in their order.
///
/// Returns the number of inserted listings.
///
/// # Errors
///
/// - If the provided data is not a JSON array of objects.
/// - If any of the listings is rejected. The preceding ones stay inserted.
pub async fn insert(
    service: &Service,
    raw: &[u8],
) -> Result<usize, Traced<LoadError>> {
    let records = serde_json::from_slice::<Vec<Payload>>(raw)
        .map_err(tracerr::from_and_wrap!(=> LoadError))?;
    let count = records.len();

    for (index, payload) in records.into_iter().enumerate() {
        _ = service
            .execute(CreateListing { payload })
            .await
            .map_err(|e| {
                tracerr::new!(LoadError::InvalidRecord {
                    index,
                    error: e.into_error(),
                })
            })?;
    }

    Ok(count)
}

/// Error of loading a dataset.
#[derive(Debug, Display, Error, From)]
pub enum LoadError {
    /// Dataset file cannot be read.
    #[display("Failed to read dataset: {_0}")]
    Io(io::Error),

    /// Dataset is not a JSON array of objects.
    #[display("Dataset is not a JSON array of objects: {_0}")]
    Json(serde_json::Error),

    /// Dataset record cannot be created.
    #[display("Dataset record #{index} is rejected: {error}")]
    #[from(ignore)]
    InvalidRecord {
        /// Index of the rejected record in the dataset.
        index: usize,

        /// [`Error`] the record is rejected with.
        ///
        /// [`Error`]: crate::Error
        #[error(source)]
        error: crate::Error,
    },
}
