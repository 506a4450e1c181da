use std::sync::Arc;

use clap::Parser;

use sselink_client::{EventSourceTransport, Subscriber, Supervisor};
use sselink_core::{ReconnectPolicy, SseConfig, SubscriberOverrides};
use sselink_telemetry::TelemetryConfig;

/// Subscribe to a server-push event stream and print dispatched events.
#[derive(Parser, Debug)]
#[command(name = "sselink", version)]
struct Args {
    /// Stream endpoint URL
    #[arg(long)]
    server: String,

    /// Comma-separated channel list (empty string = default channel)
    #[arg(long)]
    channels: Option<String>,

    /// Verbose logging; never changes the event stream itself
    #[arg(long)]
    debug: bool,

    /// Seconds to wait before rebuilding after a transport error
    #[arg(long)]
    reconnect_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let telemetry = if args.debug {
        TelemetryConfig::debug()
    } else {
        TelemetryConfig::default()
    };
    sselink_telemetry::init_telemetry(&telemetry);

    let config = SseConfig {
        server_url: Some(args.server),
        channels: Vec::new(),
        debug: args.debug,
        reconnect: match args.reconnect_secs {
            Some(secs) => ReconnectPolicy::FixedDelay {
                delay: std::time::Duration::from_secs(secs),
            },
            None => ReconnectPolicy::None,
        },
    };
    let overrides = SubscriberOverrides {
        server_url: None,
        channels: args.channels,
    };

    let subscriber = Arc::new(Subscriber::new());
    subscriber.on_any(|name, payload| {
        if payload.is_null() {
            println!("{name}");
        } else {
            println!("{name} {payload}");
        }
    });

    let transport = Arc::new(EventSourceTransport::new());
    let supervisor = Supervisor::new(config, overrides, transport, subscriber);

    tokio::select! {
        result = supervisor.run() => {
            let state = result?;
            tracing::info!(?state, "stream finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
