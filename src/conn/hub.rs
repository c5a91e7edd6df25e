use super::{client::Client, message::RoomMessage};
use crate::core::Error;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

// ========================// Hub //======================== //

/// The routing hub. Owns all room membership state and serializes every
/// mutation and every fan-out decision through a single control loop.
///
/// The loop is driven by three event queues (register, unregister,
/// broadcast) and processes exactly one event per iteration, so every state
/// transition is atomic by construction and no locks are needed.
pub struct Hub {
    /// Membership table. A room key is present iff the room has at least
    /// one member; a client appears in at most one room, the one matching
    /// its own room id.
    rooms: HashMap<String, HashMap<Uuid, Client>>,
    register_rx: mpsc::Receiver<Client>,
    unregister_rx: mpsc::Receiver<Departure>,
    broadcast_rx: mpsc::Receiver<RoomMessage>,
    status_tx: watch::Sender<HubStatus>,
}

/// Identity of a client leaving its room.
struct Departure {
    room_id: String,
    client_id: Uuid,
}

impl Hub {
    pub fn new(capacity: usize) -> (Hub, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(capacity);
        let (unregister_tx, unregister_rx) = mpsc::channel(capacity);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(capacity);
        let (status_tx, status_rx) = watch::channel(HubStatus::default());

        let hub = Hub {
            rooms: HashMap::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            status_tx,
        };
        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            status_rx,
        };
        (hub, handle)
    }

    /// Run the control loop until every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(client) = self.register_rx.recv() => self.register(client),
                Some(leave) = self.unregister_rx.recv() => self.unregister(leave),
                Some(msg) = self.broadcast_rx.recv() => self.broadcast(msg),
                else => break,
            }
            self.publish_status();
        }
        tracing::debug!("hub loop stopped");
    }

    fn register(&mut self, client: Client) {
        tracing::debug!("client {} joined room {}", client.id(), client.room_id());
        self.rooms
            .entry(client.room_id().to_owned())
            .or_default()
            .insert(client.id(), client);
    }

    /// Safe to call for a client that has already left or been evicted.
    fn unregister(&mut self, leave: Departure) {
        if let Some(members) = self.rooms.get_mut(&leave.room_id) {
            if members.remove(&leave.client_id).is_some() {
                tracing::debug!("client {} left room {}", leave.client_id, leave.room_id);
            }
            if members.is_empty() {
                self.rooms.remove(&leave.room_id);
            }
        }
    }

    /// Fan one message out to every member of its room. A message for a
    /// room with no members is silently dropped.
    ///
    /// Enqueueing never blocks: a member whose outbound queue is full is
    /// forcibly evicted instead of stalling delivery to the rest of the
    /// room. Dropping the member's table entry is what closes its queue.
    fn broadcast(&mut self, msg: RoomMessage) {
        let Some(members) = self.rooms.get_mut(&msg.room_id) else {
            return;
        };

        members.retain(|id, client| match client.try_send(msg.payload.clone()) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!("evicting client {} from room {}", id, msg.room_id);
                false
            }
        });

        if members.is_empty() {
            self.rooms.remove(&msg.room_id);
        }
    }

    fn publish_status(&self) {
        let status = HubStatus {
            num_rooms: self.rooms.len(),
            num_clients: self.rooms.values().map(HashMap::len).sum(),
        };
        self.status_tx.send_replace(status);
    }
}

// ========================// HubHandle //======================== //

/// Cloneable handle used to submit events to the hub's queues.
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<Client>,
    unregister_tx: mpsc::Sender<Departure>,
    broadcast_tx: mpsc::Sender<RoomMessage>,
    status_rx: watch::Receiver<HubStatus>,
}

impl HubHandle {
    /// Add the client to its room, creating the room entry if absent.
    pub async fn register(&self, client: Client) -> Result<(), Error> {
        self.register_tx.send(client).await?;
        Ok(())
    }

    /// Remove the client from its room and close its outbound queue.
    pub async fn unregister(&self, room_id: String, client_id: Uuid) -> Result<(), Error> {
        self.unregister_tx
            .send(Departure { room_id, client_id })
            .await?;
        Ok(())
    }

    /// Submit one inbound message for fan-out to its room.
    pub async fn broadcast(&self, msg: RoomMessage) -> Result<(), Error> {
        self.broadcast_tx.send(msg).await?;
        Ok(())
    }

    /// Current occupancy snapshot.
    pub fn status(&self) -> HubStatus {
        self.status_rx.borrow().clone()
    }

    /// Watch channel carrying the occupancy snapshot, refreshed after every
    /// processed event.
    pub fn status_watch(&self) -> watch::Receiver<HubStatus> {
        self.status_rx.clone()
    }
}

/// Occupancy of the hub.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HubStatus {
    pub num_rooms: usize,
    pub num_clients: usize,
}

// ============================== // tests // ============================== //
