//! MQTT telemetry source.
//!
//! Devices (or a bridge in front of them) publish their endpoint snapshot as
//! JSON to `<topic_prefix>/<slug>/endpoints`. Every publish replaces the
//! stored snapshot for that slug. Malformed topics or payloads are logged
//! and skipped; the run loop only ends when the connection does.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use linkme::distributed_slice;
use rumqttc::AsyncClient;
use rumqttc::Event;
use rumqttc::MqttOptions;
use rumqttc::Packet;
use rumqttc::QoS;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::IngestContext;
use super::IngestFactoryResult;
use super::IngestSource;
use crate::config::MqttConfig;
use crate::snapshot::Endpoint;
use crate::store::DeviceStore;

#[distributed_slice(super::REGISTRY)]
fn init_mqtt(ctx: &IngestContext) -> IngestFactoryResult {
    let Some(mqtt_config) = &ctx.config.ingest.mqtt else {
        return Ok(None);
    };

    let client = RumqttcClient::new(mqtt_config).context("Failed to create MQTT client")?;
    Ok(Some(Box::new(MqttIngest::new(
        Box::new(client),
        mqtt_config.topic_prefix.clone(),
        ctx.store.clone(),
    ))))
}

/// Why one MQTT message was dropped. Never fatal to the run loop.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("topic does not match <prefix>/<slug>/endpoints")]
    UnexpectedTopic,
    #[error("invalid endpoint payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// MQTT message received from a subscription
#[derive(Debug, Clone)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    #[allow(dead_code)]
    pub retain: bool,
}

/// Trait for MQTT client operations
///
/// This trait allows for mocking the MQTT client for testing purposes
#[async_trait]
pub trait MqttClient: Send + Sync {
    /// Connect to the MQTT broker
    async fn connect(&mut self) -> Result<(), Box<dyn Error + Send>>;

    /// Subscribe to an MQTT topic
    async fn subscribe(&mut self, topic: &str) -> Result<(), Box<dyn Error + Send>>;

    /// Poll for the next message from subscribed topics
    ///
    /// Returns None if no message is available or if the client should stop
    async fn poll_message(&mut self) -> Option<MqttMessage>;
}

/// The MQTT ingest source: one client, one topic filter, one store.
pub struct MqttIngest {
    client: Box<dyn MqttClient>,
    topic_prefix: String,
    store: Arc<DeviceStore>,
}

impl MqttIngest {
    pub fn new(client: Box<dyn MqttClient>, topic_prefix: String, store: Arc<DeviceStore>) -> Self {
        Self {
            client,
            topic_prefix,
            store,
        }
    }
}

#[async_trait]
impl IngestSource for MqttIngest {
    fn name(&self) -> &str {
        "mqtt"
    }

    async fn run(mut self: Box<Self>) -> anyhow::Result<()> {
        self.client
            .connect()
            .await
            .map_err(|e| anyhow::anyhow!("MQTT connect failed: {}", e))?;

        let topic = format!("{}/+/endpoints", self.topic_prefix);
        self.client
            .subscribe(&topic)
            .await
            .map_err(|e| anyhow::anyhow!("MQTT subscribe failed: {}", e))?;
        info!("MQTT ingest subscribed to {}", topic);

        while let Some(message) = self.client.poll_message().await {
            match apply_message(&self.store, &self.topic_prefix, &message) {
                Ok((slug, revision)) => {
                    debug!(slug, revision, "stored endpoint snapshot");
                }
                Err(e) => {
                    warn!("ignoring MQTT message on '{}': {}", message.topic, e);
                }
            }
        }

        Ok(())
    }
}

/// Decode one publish and replace the device's stored snapshot.
fn apply_message(
    store: &DeviceStore,
    topic_prefix: &str,
    message: &MqttMessage,
) -> Result<(String, u64), IngestError> {
    let slug = parse_slug(&message.topic, topic_prefix).ok_or(IngestError::UnexpectedTopic)?;
    let endpoints: Vec<Endpoint> = serde_json::from_slice(&message.payload)?;
    let revision = store.replace_endpoints(slug, endpoints);
    Ok((slug.to_string(), revision))
}

/// Extract the device slug from `<prefix>/<slug>/endpoints`.
fn parse_slug<'a>(topic: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = topic.strip_prefix(prefix)?.strip_prefix('/')?;
    let slug = rest.strip_suffix("/endpoints")?;
    (!slug.is_empty() && !slug.contains('/')).then_some(slug)
}

/// Real MQTT client implementation using rumqttc
pub struct RumqttcClient {
    /// MQTT connection options (stored for lazy initialization)
    mqtt_options: MqttOptions,

    /// AsyncClient (created in connect())
    client: Option<AsyncClient>,

    /// Message receiver (created in connect())
    message_rx: Option<mpsc::UnboundedReceiver<MqttMessage>>,

    /// Background event loop task handle
    event_loop_task: Option<JoinHandle<()>>,
}

impl RumqttcClient {
    /// Create a new RumqttcClient from configuration
    pub fn new(config: &MqttConfig) -> anyhow::Result<Self> {
        let mut mqtt_options =
            MqttOptions::new(config.client_id.clone(), config.broker.clone(), config.port);

        mqtt_options.set_keep_alive(Duration::from_secs(30));

        // Allow large MQTT packets (2 MiB) for full endpoint snapshots
        mqtt_options.set_max_packet_size(2 * 1024 * 1024, 2 * 1024 * 1024);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            mqtt_options.set_credentials(username, password);
        }

        Ok(Self {
            mqtt_options,
            client: None,
            message_rx: None,
            event_loop_task: None,
        })
    }
}

#[async_trait]
impl MqttClient for RumqttcClient {
    async fn connect(&mut self) -> Result<(), Box<dyn Error + Send>> {
        let (client, mut event_loop) = AsyncClient::new(self.mqtt_options.clone(), 10);

        let (message_tx, message_rx) = mpsc::unbounded_channel();

        // Background task pumping the rumqttc event loop into the channel
        let task = tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let msg = MqttMessage {
                            topic: publish.topic.to_string(),
                            payload: publish.payload.to_vec(),
                            retain: publish.retain,
                        };

                        // Send to channel; if receiver dropped, exit
                        if message_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {
                        // Ignore other events (connack, suback, etc.)
                    }
                    Err(e) => {
                        warn!("MQTT event loop error: {}", e);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
            info!("MQTT event loop task exiting");
        });

        self.client = Some(client);
        self.message_rx = Some(message_rx);
        self.event_loop_task = Some(task);

        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), Box<dyn Error + Send>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| -> Box<dyn Error + Send> {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "MQTT client not connected. Call connect() first.",
                ))
            })?;

        client
            .subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(|e| Box::new(e) as Box<dyn Error + Send>)?;

        Ok(())
    }

    async fn poll_message(&mut self) -> Option<MqttMessage> {
        match &mut self.message_rx {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

impl Drop for RumqttcClient {
    fn drop(&mut self) {
        if let Some(task) = self.event_loop_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::ClusterInstance;

    /// Mock MQTT client for testing
    #[derive(Debug, Default)]
    struct MockMqttClient {
        messages: Vec<MqttMessage>,
        is_connected: bool,
        subscriptions: Vec<String>,
    }

    #[async_trait]
    impl MqttClient for MockMqttClient {
        async fn connect(&mut self) -> Result<(), Box<dyn Error + Send>> {
            self.is_connected = true;
            Ok(())
        }

        async fn subscribe(&mut self, topic: &str) -> Result<(), Box<dyn Error + Send>> {
            self.subscriptions.push(topic.to_string());
            Ok(())
        }

        async fn poll_message(&mut self) -> Option<MqttMessage> {
            self.messages.pop()
        }
    }

    fn message(topic: &str, payload: &str) -> MqttMessage {
        MqttMessage {
            topic: topic.to_string(),
            payload: payload.as_bytes().to_vec(),
            retain: false,
        }
    }

    fn endpoints_json() -> String {
        let endpoints = vec![Endpoint::new(1, 0x0101)
            .with_clusters([ClusterInstance::server(0x0006).with_attributes(["OnOff"])])];
        serde_json::to_string(&endpoints).unwrap()
    }

    #[test]
    fn test_parse_slug() {
        assert_eq!(
            parse_slug("matter/hue-bulb/endpoints", "matter"),
            Some("hue-bulb")
        );
        assert_eq!(parse_slug("matter/hue-bulb/state", "matter"), None);
        assert_eq!(parse_slug("other/hue-bulb/endpoints", "matter"), None);
        assert_eq!(parse_slug("matter//endpoints", "matter"), None);
        assert_eq!(parse_slug("matter/a/b/endpoints", "matter"), None);
    }

    #[test]
    fn test_apply_message_stores_snapshot() {
        let store = DeviceStore::new();
        let msg = message("matter/hue-bulb/endpoints", &endpoints_json());

        let (slug, revision) = apply_message(&store, "matter", &msg).unwrap();
        assert_eq!(slug, "hue-bulb");
        assert_eq!(revision, 1);

        let snapshot = store.get("hue-bulb").unwrap();
        assert_eq!(snapshot.endpoints.len(), 1);
        assert_eq!(snapshot.endpoints[0].device_type_id, 0x0101);
    }

    #[test]
    fn test_apply_message_rejects_bad_topic() {
        let store = DeviceStore::new();
        let msg = message("matter/hue-bulb/state", &endpoints_json());

        let err = apply_message(&store, "matter", &msg).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedTopic));
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_message_rejects_bad_payload() {
        let store = DeviceStore::new();
        let msg = message("matter/hue-bulb/endpoints", "{not json");

        let err = apply_message(&store, "matter", &msg).unwrap_err();
        assert!(matches!(err, IngestError::Payload(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_run_drains_messages_and_skips_malformed() {
        let store = Arc::new(DeviceStore::new());
        let client = MockMqttClient {
            messages: vec![
                message("matter/hue-bulb/endpoints", &endpoints_json()),
                message("matter/broken/endpoints", "{not json"),
            ],
            ..Default::default()
        };

        let ingest = Box::new(MqttIngest::new(
            Box::new(client),
            "matter".to_string(),
            store.clone(),
        ));
        ingest.run().await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("hue-bulb").is_some());
        assert!(store.get("broken").is_none());
    }
}
