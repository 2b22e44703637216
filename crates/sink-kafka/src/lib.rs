//! Kafka sink for datagen.
//!
//! Publishes each record to the emitter's topic through an `rdkafka`
//! `FutureProducer`. Topics can be created on startup when the broker does
//! not auto-create them.

pub mod error;
pub mod settings;
pub mod sink;

pub use error::KafkaSinkError;
pub use settings::KafkaSettings;
pub use sink::{create_topic, KafkaSink};
