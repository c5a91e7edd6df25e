mod api;
mod conn;
mod core;
mod util;

pub use api::make_app;
pub use conn::{Client, Hub, HubHandle, HubStatus, RoomMessage};
pub use util::config::Config;
