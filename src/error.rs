use crate::dataset::error::DatasetError;
use crate::query::error::QueryError;
use crate::schema::SchemaError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridClimError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no data directory configured; build the client with a data dir to load datasets")]
    NoDataDir,
}
