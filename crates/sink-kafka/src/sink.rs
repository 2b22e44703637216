use crate::error::KafkaSinkError;
use crate::settings::KafkaSettings;
use async_trait::async_trait;
use emit_core::{OutputHint, Sink, SinkError};
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);
const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Sink publishing records to one Kafka topic.
pub struct KafkaSink {
    producer: FutureProducer,
    topic: String,
}

impl KafkaSink {
    /// Build a producer for `topic`, creating the topic first when
    /// `settings.auto_create` is set.
    pub async fn connect(settings: &KafkaSettings, topic: &str) -> Result<Self, KafkaSinkError> {
        let mut config = ClientConfig::new();
        for (key, value) in settings.producer_properties() {
            config.set(key, value);
        }
        let producer: FutureProducer = config.create()?;

        if settings.auto_create {
            create_topic(settings, topic).await?;
        }

        info!(
            "Kafka sink ready (servers={}, topic={})",
            settings.bootstrap_servers, topic
        );

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Topic a record goes to: the hint's, if it names one.
fn target_topic<'a>(default: &'a str, hint: Option<&'a OutputHint>) -> &'a str {
    match hint {
        Some(OutputHint::Topic(topic)) => topic,
        _ => default,
    }
}

/// Create `topic`, treating an existing topic as success.
pub async fn create_topic(settings: &KafkaSettings, topic: &str) -> Result<(), KafkaSinkError> {
    let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
        .set("bootstrap.servers", &settings.bootstrap_servers)
        .create()?;

    let new_topic = NewTopic::new(
        topic,
        settings.partitions,
        TopicReplication::Fixed(settings.replication),
    );
    let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

    let results = admin_client
        .create_topics(&[new_topic], &opts)
        .await
        .map_err(|e| KafkaSinkError::TopicCreation(format!("Failed to create topic: {e}")))?;

    for result in results {
        match result {
            Ok(topic_name) => info!("Topic '{}' created", topic_name),
            Err((topic_name, err)) => {
                let err_str = err.to_string();
                if err_str.contains("already exists") || err_str.contains("TopicExistsException") {
                    debug!("Topic '{}' already exists", topic_name);
                } else {
                    return Err(KafkaSinkError::TopicCreation(format!(
                        "Failed to create topic {topic_name}: {err}"
                    )));
                }
            }
        }
    }

    Ok(())
}

#[async_trait]
impl Sink for KafkaSink {
    async fn produce(&self, key: &[u8], value: &[u8], hint: Option<&OutputHint>) {
        let topic = target_topic(&self.topic, hint);
        let record = FutureRecord::to(topic).key(key).payload(value);

        if let Err((err, _)) = self.producer.send(record, SEND_TIMEOUT).await {
            warn!("Failed to deliver record to topic '{}': {}", topic, err);
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(FLUSH_TIMEOUT))
            .await
            .map_err(|e| KafkaSinkError::Flush(e.to_string()))?
            .map_err(|e| KafkaSinkError::Flush(e.to_string()))?;

        debug!("Kafka producer for topic '{}' flushed", self.topic);
        Ok(())
    }
}
