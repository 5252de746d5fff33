#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no vault")]
    NoVault,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Caller contract violations which would otherwise produce misleading results.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PreconditionError {
    #[error("no exercise reference data available")]
    NoReferenceData,
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        ServiceError::Read(ReadError::Storage(value))
    }
}
