//! Output labels wired to their backends.

use crate::config::GlobalConfig;
use emit_core::{EmitterDefinition, Sink, SinkError, SinkRegistry};
use sink_kafka::KafkaSink;
use sink_mongodb::MongoSink;
use sink_redis::RedisSink;
use std::sync::Arc;

/// Registry with every supported output: `stdout`, `memory`, `kafka`,
/// `redis`, and `mongo` (alias `mongodb`).
pub fn default_registry(global: &GlobalConfig) -> SinkRegistry {
    let mut registry = SinkRegistry::with_builtin();

    let kafka = Arc::new(global.kafka.clone());
    registry.register("kafka", move |definition: &EmitterDefinition| {
        let settings = Arc::clone(&kafka);
        let topic = definition.topic.clone();
        async move {
            let sink = KafkaSink::connect(&settings, &topic).await?;
            Ok::<_, SinkError>(Box::new(sink) as Box<dyn Sink>)
        }
    });

    let redis = Arc::new(global.redis.clone());
    registry.register("redis", move |_: &EmitterDefinition| {
        let settings = Arc::clone(&redis);
        async move {
            let sink = RedisSink::connect(&settings).await?;
            Ok::<_, SinkError>(Box::new(sink) as Box<dyn Sink>)
        }
    });

    for label in ["mongo", "mongodb"] {
        let mongodb = Arc::new(global.mongodb.clone());
        registry.register(label, move |_: &EmitterDefinition| {
            let settings = Arc::clone(&mongodb);
            async move {
                let sink = MongoSink::connect(&settings).await?;
                Ok::<_, SinkError>(Box::new(sink) as Box<dyn Sink>)
            }
        });
    }

    registry
}

/// Registry for the requested mode: real backends, or counting memory
/// sinks for a dry run.
pub fn registry_for(global: &GlobalConfig, dry_run: bool) -> SinkRegistry {
    if dry_run {
        SinkRegistry::dry_run()
    } else {
        default_registry(global)
    }
}
