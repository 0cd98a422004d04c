//! Crate-level error type

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;
use crate::validation::ValidationError;

/// Any failure a todo operation can report
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
