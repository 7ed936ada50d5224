//! Mid-price consumer: drains envelopes from the replay queue, computes bid/ask
//! mid-prices, and diverts latency-breaching historical messages to an error log.

mod config;
mod consumer;
mod error;

pub use config::ConsumerConfig;
pub use consumer::MidPriceConsumer;
pub use error::ConsumerError;
