//! MongoDB sink for datagen.
//!
//! Each rendered value is parsed as a JSON object and inserted as one BSON
//! document. Values that are not JSON objects are logged and dropped.

pub mod error;

use async_trait::async_trait;
use bson::Document;
use emit_core::{OutputHint, Sink, SinkError};
use mongodb::{Client, Collection, Database};
use serde::Deserialize;
use tracing::{debug, info, warn};

pub use error::MongoSinkError;

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// The `global.mongodb` configuration section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MongoSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_name")]
    pub database: String,

    #[serde(default = "default_name")]
    pub collection: String,
}

fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_name() -> String {
    "datagen".to_string()
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_name(),
            collection: default_name(),
        }
    }
}

pub struct MongoSink {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoSink {
    pub async fn connect(settings: &MongoSettings) -> Result<Self, MongoSinkError> {
        let client = Client::with_uri_str(&settings.uri).await?;
        let database = client.database(&settings.database);

        // Test connection
        database.list_collection_names().await?;

        info!(
            "MongoDB sink connected (database={}, collection={})",
            settings.database, settings.collection
        );

        Ok(Self {
            collection: database.collection(&settings.collection),
            database,
            client,
        })
    }

    fn target(&self, hint: Option<&OutputHint>) -> Collection<Document> {
        match hint {
            Some(OutputHint::Collection(name)) => self.database.collection(name),
            _ => self.collection.clone(),
        }
    }
}

/// Parse a rendered value into a document.
pub fn to_document(value: &[u8]) -> Result<Document, MongoSinkError> {
    let json: serde_json::Value = serde_json::from_slice(value)
        .map_err(|e| MongoSinkError::NotAnObject(e.to_string()))?;
    if !json.is_object() {
        return Err(MongoSinkError::NotAnObject(format!(
            "found {}",
            json_kind(&json)
        )));
    }
    Ok(bson::to_document(&json)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[async_trait]
impl Sink for MongoSink {
    async fn produce(&self, _key: &[u8], value: &[u8], hint: Option<&OutputHint>) {
        let document = match to_document(value) {
            Ok(document) => document,
            Err(e) => {
                warn!("Skipping record: {e}");
                return;
            }
        };

        let collection = self.target(hint);
        if let Err(e) = collection.insert_one(document).await {
            warn!(
                "Failed to insert document into '{}': {}",
                collection.name(),
                e
            );
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.client.clone().shutdown().await;
        debug!("MongoDB client shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: MongoSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, MongoSettings::default());

        let settings: MongoSettings =
            serde_yaml::from_str("uri: mongodb://db:27017\ndatabase: shop\ncollection: orders\n")
                .unwrap();
        assert_eq!(settings.database, "shop");
        assert_eq!(settings.collection, "orders");
    }

    #[test]
    fn test_object_becomes_document() {
        let document = to_document(br#"{"name": "Ada", "age": 36, "tags": ["a", "b"]}"#).unwrap();
        assert_eq!(document.get_str("name").unwrap(), "Ada");
        assert!(matches!(
            document.get("age"),
            Some(bson::Bson::Int64(36)) | Some(bson::Bson::Int32(36))
        ));
        assert_eq!(document.get_array("tags").unwrap().len(), 2);
    }

    #[test]
    fn test_non_objects_are_rejected() {
        assert!(matches!(
            to_document(b"[1, 2]"),
            Err(MongoSinkError::NotAnObject(reason)) if reason == "found an array"
        ));
        assert!(to_document(b"not json").is_err());
        assert!(to_document(b"").is_err());
    }
}
