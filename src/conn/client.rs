use tokio::sync::mpsc;
use uuid::Uuid;

/// Server-side state of one live connection.
///
/// Holds the sending half of the connection's outbound queue. Once
/// registered, the hub's membership table is the sole long-lived owner, so
/// removing the table entry closes the queue and the write pump observes
/// the close on its next receive.
pub struct Client {
    id: Uuid,
    room_id: String,
    tx: mpsc::Sender<String>,
}

impl Client {
    pub fn new(room_id: String, tx: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            tx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Non-blocking enqueue onto the outbound queue.
    pub(crate) fn try_send(&self, payload: String) -> Result<(), mpsc::error::TrySendError<String>> {
        self.tx.try_send(payload)
    }
}
