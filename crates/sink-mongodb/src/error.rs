//! Error types for the MongoDB sink.

use emit_core::SinkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MongoSinkError {
    /// MongoDB connection or query error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// The rendered value is not a JSON object.
    #[error("value is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("BSON conversion error: {0}")]
    Bson(#[from] bson::ser::Error),
}

impl From<MongoSinkError> for SinkError {
    fn from(err: MongoSinkError) -> Self {
        SinkError::Connection(err.to_string())
    }
}
