//! Runtime side of sselink: subscriber event surfaces, the connection
//! manager, and transport implementations.
//!
//! Typical flow: resolve a [`sselink_core::Subscription`], create a
//! [`Subscriber`] and register handlers, then hand both to a [`Connection`]
//! over an injected [`sselink_core::Transport`]:
//!
//! ```no_run
//! # async fn demo() -> Result<(), sselink_core::LinkError> {
//! use std::sync::Arc;
//! use sselink_core::{SseConfig, SubscriberOverrides, Subscription};
//! use sselink_client::{Connection, EventSourceTransport, Subscriber};
//!
//! let config = SseConfig {
//!     server_url: Some("https://h/stream".into()),
//!     channels: vec!["a".into(), "b".into()],
//!     ..Default::default()
//! };
//! let subscription = Subscription::resolve(&config, &SubscriberOverrides::default())?;
//!
//! let subscriber = Arc::new(Subscriber::new());
//! subscriber.on("sse.ping", |payload| println!("ping: {payload}"));
//!
//! let transport = Arc::new(EventSourceTransport::new());
//! let connection = Connection::new(transport, subscriber);
//! connection.open(&subscription).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod dispatch;
pub mod eventsource;
pub mod reconnect;
pub mod subscriber;
pub mod wire;

pub mod mock;

pub use connection::{Connection, ConnectionState};
pub use eventsource::EventSourceTransport;
pub use mock::{MockScript, MockTransport};
pub use reconnect::Supervisor;
pub use subscriber::Subscriber;
