pub mod config;
pub mod errors;
pub mod events;
pub mod frame;
pub mod ids;
pub mod subscription;
pub mod transport;

pub use config::{ReconnectPolicy, SseConfig, SubscriberOverrides};
pub use errors::LinkError;
pub use frame::Frame;
pub use ids::SubscriberId;
pub use subscription::Subscription;
pub use transport::{Transport, TransportEvent, TransportStream};
