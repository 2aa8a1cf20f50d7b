use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;

use anyhow::{bail, Context};
use embedded_svc::mqtt::client::QoS;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::mqtt::client::{
    EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration,
};
use log::{info, warn};

use crate::configuration::nvs_configuration::NvsConfiguration;

use super::ChannelWriter;

const CONNECT_TIMEOUT_MS: u32 = 30_000;
const CONNECT_POLL_MS: u32 = 250;

/// Session with the dashboard broker. Channel `n` lands on
/// `plantpulse/<id>/v<n>`.
pub struct DashboardClient {
    client: EspMqttClient<'static>,
    topic_prefix: String,
    connected: Arc<AtomicBool>,
}

impl DashboardClient {
    /// Open the session and block until the broker accepts it. Keep-alive
    /// and reconnection stay with the underlying client after that.
    pub fn connect(config: &NvsConfiguration) -> anyhow::Result<Self> {
        let host = config.get_dashboard_host();
        if host.is_empty() {
            bail!("No dashboard host provisioned");
        }

        let url = format!("mqtt://{}:{}", host, config.get_dashboard_port());
        let device_name = config.get_name();
        let token = config.get_token();

        let mqtt_config = MqttClientConfiguration {
            client_id: Some(device_name.as_str()),
            username: Some(device_name.as_str()),
            password: if token.is_empty() {
                None
            } else {
                Some(token.as_str())
            },
            ..Default::default()
        };

        let (client, connection) = EspMqttClient::new(&url, &mqtt_config)
            .with_context(|| format!("Failed to open dashboard session to {url}"))?;

        let connected = Arc::new(AtomicBool::new(false));
        spawn_event_drain(connection, connected.clone());

        let session = Self {
            client,
            topic_prefix: format!("plantpulse/{}", config.get_id()),
            connected,
        };
        session.wait_connected()?;

        Ok(session)
    }

    fn wait_connected(&self) -> anyhow::Result<()> {
        let mut waited = 0;

        while !self.connected.load(Ordering::Relaxed) {
            if waited >= CONNECT_TIMEOUT_MS {
                bail!("Dashboard session not up after {CONNECT_TIMEOUT_MS} ms");
            }

            FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited += CONNECT_POLL_MS;
        }

        info!("Dashboard session up");
        Ok(())
    }
}

impl ChannelWriter for DashboardClient {
    fn write_channel(&mut self, channel: u8, value: &str) -> anyhow::Result<()> {
        let topic = format!("{}/v{}", self.topic_prefix, channel);

        self.client
            .publish(&topic, QoS::AtLeastOnce, false, value.as_bytes())
            .with_context(|| format!("Publish to channel {channel} failed"))?;

        Ok(())
    }
}

/// The connection has to be drained or the client stalls; the same thread
/// tracks session state for the blocking connect.
fn spawn_event_drain(mut connection: EspMqttConnection, connected: Arc<AtomicBool>) {
    thread::Builder::new()
        .name("mqtt-events".into())
        .stack_size(6 * 1024)
        .spawn(move || loop {
            match connection.next() {
                Ok(event) => match event.payload() {
                    EventPayload::Connected(_) => connected.store(true, Ordering::Relaxed),
                    EventPayload::Disconnected => {
                        connected.store(false, Ordering::Relaxed);
                        warn!("Dashboard session lost");
                    }
                    _ => (),
                },
                // The client side hung up; nothing left to drain.
                Err(_) => break,
            }
        })
        .expect("failed to spawn mqtt event thread");
}
