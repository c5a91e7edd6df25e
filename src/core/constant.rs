/// Capacity of each client's outbound queue.
pub const CLIENT_QUEUE_CAPACITY: usize = 256;

/// Capacity of each of the hub's event queues.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Maximum inbound frame size allowed from a peer, in bytes.
pub const MAX_FRAME_SIZE: usize = 512;

/// Window in which a peer must produce at least one frame (pongs count).
pub const IDLE_TIMEOUT_SECS: u64 = 60;

/// Time allowed for a single write to the peer.
pub const WRITE_DEADLINE_SECS: u64 = 10;
