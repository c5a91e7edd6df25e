//! Management of connections for the relay

mod client;
pub use client::Client;

mod hub;
pub use hub::{Hub, HubHandle, HubStatus};

mod message;
pub use message::{normalize_line, RoomMessage};
