use tracing::{debug, info};
use url::form_urlencoded;

use crate::config::{SseConfig, SubscriberOverrides};
use crate::errors::LinkError;

/// Resolved connection target + channel scope for one subscriber.
/// Immutable once built; reconfiguring means building a new subscription
/// (and with it a new connection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub resolved_url: String,
    pub channel_scope: Vec<String>,
}

impl Subscription {
    /// Resolve a subscription from layered configuration. Overrides win over
    /// config defaults field by field:
    ///
    /// - target: override server URL, else `config.server_url`, else fail —
    ///   the caller must not open a connection.
    /// - channel scope: an override channel string, when present (even
    ///   explicitly empty), is split on `,` and used verbatim; absent falls
    ///   back to `config.channels`.
    ///
    /// A non-empty scope becomes a repeated `channels` query parameter, one
    /// entry per channel, order and duplicates preserved. An empty scope adds
    /// no query parameter and targets the transport's default channel.
    pub fn resolve(
        config: &SseConfig,
        overrides: &SubscriberOverrides,
    ) -> Result<Subscription, LinkError> {
        let server = overrides
            .server_url
            .as_deref()
            .or(config.server_url.as_deref())
            .ok_or(LinkError::NoServer)?;

        let channel_scope: Vec<String> = match overrides.channels.as_deref() {
            Some("") => Vec::new(),
            Some(raw) => raw.split(',').map(str::to_string).collect(),
            None => config.channels.clone(),
        };

        let resolved_url = if channel_scope.is_empty() {
            if config.debug {
                info!(server, "no channels specified, listening on the default channel");
            }
            server.to_string()
        } else {
            let query: String = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(channel_scope.iter().map(|c| ("channels", c)))
                .finish();
            format!("{server}?{query}")
        };

        if config.debug {
            debug!(url = %resolved_url, "resolved subscription target");
        }

        Ok(Subscription {
            resolved_url,
            channel_scope,
        })
    }
}
