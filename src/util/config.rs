use crate::core::constant;
use std::env;
use tokio::time::Duration;

// ========================// Config //======================== //

/// Configure of the App
#[derive(Debug, Clone)]
pub struct Config {
    pub ip: String,
    pub port: String,
    pub client_queue_capacity: usize,
    pub event_queue_capacity: usize,
    pub max_frame_size: usize,
    pub idle_timeout_secs: u64,
    pub write_deadline_secs: u64,
}

impl Config {
    /// Initialize the Config from env
    pub fn from_env() -> Config {
        let ip = env::var("SERVER_IP").unwrap_or("127.0.0.1".to_owned());
        let port = env::var("SERVER_PORT").unwrap_or("3000".to_owned());

        let client_queue_capacity: usize = env::var("CLIENT_QUEUE_CAPACITY")
            .unwrap_or(constant::CLIENT_QUEUE_CAPACITY.to_string())
            .parse()
            .expect("failed to parse CLIENT_QUEUE_CAPACITY");

        let event_queue_capacity: usize = env::var("EVENT_QUEUE_CAPACITY")
            .unwrap_or(constant::EVENT_QUEUE_CAPACITY.to_string())
            .parse()
            .expect("failed to parse EVENT_QUEUE_CAPACITY");

        let max_frame_size: usize = env::var("MAX_FRAME_SIZE")
            .unwrap_or(constant::MAX_FRAME_SIZE.to_string())
            .parse()
            .expect("failed to parse MAX_FRAME_SIZE");

        let idle_timeout_secs: u64 = env::var("IDLE_TIMEOUT")
            .unwrap_or(constant::IDLE_TIMEOUT_SECS.to_string())
            .parse()
            .expect("failed to parse IDLE_TIMEOUT");

        let write_deadline_secs: u64 = env::var("WRITE_DEADLINE")
            .unwrap_or(constant::WRITE_DEADLINE_SECS.to_string())
            .parse()
            .expect("failed to parse WRITE_DEADLINE");

        Config {
            ip,
            port,
            client_queue_capacity,
            event_queue_capacity,
            max_frame_size,
            idle_timeout_secs,
            write_deadline_secs,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Pings are sent with this period. Must be less than the idle-timeout.
    pub fn keepalive_period(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs * 9 / 10)
    }

    pub fn write_deadline(&self) -> Duration {
        Duration::from_secs(self.write_deadline_secs)
    }
}

// ============================== // tests // ============================== //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keepalive_stays_below_idle_timeout() {
        let config = Config::from_env();
        assert!(config.keepalive_period() < config.idle_timeout());
    }
}
