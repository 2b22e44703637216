//! Error types for the Kafka sink.

use emit_core::SinkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KafkaSinkError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),

    #[error("Flush error: {0}")]
    Flush(String),
}

impl From<KafkaSinkError> for SinkError {
    fn from(err: KafkaSinkError) -> Self {
        match err {
            KafkaSinkError::Kafka(e) => SinkError::Connection(e.to_string()),
            KafkaSinkError::TopicCreation(e) => SinkError::Config(e),
            KafkaSinkError::Flush(e) => SinkError::Close(e),
        }
    }
}
