//! Outgoing queue for forwarding into a bounded channel from a `tokio::select!` loop.<br/>
//! `tokio::select!` ループから有界チャネルへ転送するための送信キュー。
//!
//! ```
//! use chanq_rs::OutgoingQueue;
//! use tokio::sync::mpsc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (in_tx, mut input) = mpsc::channel(1);
//! let (out, mut out_rx) = mpsc::channel(1);
//! # let consumer = tokio::spawn(async move { while out_rx.recv().await.is_some() {} });
//! # tokio::spawn(async move {
//! #   for msg in ["one", "two", "three"] {
//! #     in_tx.send(msg.to_string()).await.unwrap();
//! #   }
//! # });
//! let mut queue = OutgoingQueue::new(out);
//! let mut input_open = true;
//! while input_open || !queue.is_empty() {
//!   tokio::select! {
//!     msg = input.recv(), if input_open => match msg {
//!       Some(msg) => queue.enqueue(msg),
//!       None => input_open = false,
//!     },
//!     Ok(permit) = queue.reserve() => queue.send(permit),
//!     else => break,
//!   }
//! }
//! # drop(queue);
//! # consumer.await.unwrap();
//! # }
//! ```

pub mod collections;
pub mod config;
pub mod config_option;
pub mod forwarder;

pub use collections::{OutgoingQueue, OutgoingQueueError};
pub use config::Config;
pub use config_option::ConfigOption;
pub use forwarder::{ForwardSummary, Forwarder, ForwarderHandle};

pub mod prelude {
  pub use super::{
    Config, ConfigOption, ForwardSummary, Forwarder, ForwarderHandle, OutgoingQueue, OutgoingQueueError,
  };
}
