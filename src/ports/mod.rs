//! Port traits: the seams between the domain and the outside world.

pub mod config_port;
pub mod price_feed_port;
pub mod sentiment_port;
