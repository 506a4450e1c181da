use std::sync::Arc;

use tracing::{info, warn};

use sselink_core::config::{SseConfig, SubscriberOverrides};
use sselink_core::errors::LinkError;
use sselink_core::subscription::Subscription;
use sselink_core::transport::Transport;

use crate::connection::{Connection, ConnectionState};
use crate::subscriber::Subscriber;

/// Opt-in resilience around the non-retrying connection manager: when a
/// connection lands in `Error`, the supervisor rebuilds a fresh
/// Subscription + Connection pair according to `config.reconnect`. With the
/// default `ReconnectPolicy::None` it behaves exactly like a single
/// `Connection::run`.
pub struct Supervisor {
    config: SseConfig,
    overrides: SubscriberOverrides,
    transport: Arc<dyn Transport>,
    subscriber: Arc<Subscriber>,
}

impl Supervisor {
    pub fn new(
        config: SseConfig,
        overrides: SubscriberOverrides,
        transport: Arc<dyn Transport>,
        subscriber: Arc<Subscriber>,
    ) -> Self {
        Self {
            config,
            overrides,
            transport,
            subscriber,
        }
    }

    /// Drive connections until one ends without error or the policy gives up.
    /// Configuration errors abort before anything is opened.
    pub async fn run(&self) -> Result<ConnectionState, LinkError> {
        let mut attempt = 0u32;
        loop {
            let subscription = Subscription::resolve(&self.config, &self.overrides)?;
            let connection =
                Connection::new(Arc::clone(&self.transport), Arc::clone(&self.subscriber));
            let final_state = connection.run(&subscription).await?;

            if final_state != ConnectionState::Error {
                return Ok(final_state);
            }

            match self.config.reconnect.next_delay(attempt) {
                Some(delay) => {
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "rebuilding subscription after transport error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    info!(attempts = attempt + 1, "not reconnecting");
                    return Ok(ConnectionState::Error);
                }
            }
        }
    }
}
