//! Broadcast hub for session payloads.
//!
//! Three independent broadcast channels fan session output to whatever
//! transport sits in front of the coordinator: state updates from the
//! simulation loop, frame updates from the screenshot loop, and
//! attributed commentary from decisions and external callers. A bounded
//! in-memory log keeps the recent commentary for late joiners.

use std::collections::VecDeque;

use kanto_types::{CommentaryEntry, FrameUpdate, StateUpdate};
use tokio::sync::{RwLock, broadcast};

/// Capacity of each broadcast channel.
///
/// A subscriber that falls behind by more than this many messages
/// receives a lag notice and skips to the newest message.
const BROADCAST_CAPACITY: usize = 256;

/// How many commentary entries the in-memory log retains.
const COMMENTARY_LOG_CAP: usize = 200;

/// Fan-out point for everything the session publishes.
pub struct SessionHub {
    states_tx: broadcast::Sender<StateUpdate>,
    frames_tx: broadcast::Sender<FrameUpdate>,
    commentary_tx: broadcast::Sender<CommentaryEntry>,
    commentary_log: RwLock<VecDeque<CommentaryEntry>>,
}

impl SessionHub {
    /// Creates a hub with empty channels and an empty commentary log.
    pub fn new() -> Self {
        let (states_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (frames_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (commentary_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            states_tx,
            frames_tx,
            commentary_tx,
            commentary_log: RwLock::new(VecDeque::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Subscribe to game-state broadcasts.
    pub fn subscribe_states(&self) -> broadcast::Receiver<StateUpdate> {
        self.states_tx.subscribe()
    }

    /// Subscribe to screenshot broadcasts.
    pub fn subscribe_frames(&self) -> broadcast::Receiver<FrameUpdate> {
        self.frames_tx.subscribe()
    }

    /// Subscribe to commentary broadcasts.
    pub fn subscribe_commentary(&self) -> broadcast::Receiver<CommentaryEntry> {
        self.commentary_tx.subscribe()
    }

    // -----------------------------------------------------------------------
    // Publication
    // -----------------------------------------------------------------------

    /// Publish a state update to all subscribers.
    ///
    /// Returns the number of receivers. 0 when nobody is subscribed,
    /// which is not an error.
    pub fn publish_state(&self, update: StateUpdate) -> usize {
        // send returns Err only when there are zero receivers.
        self.states_tx.send(update).unwrap_or(0)
    }

    /// Publish a frame update to all subscribers.
    ///
    /// Returns the number of receivers, 0 when nobody is subscribed.
    pub fn publish_frame(&self, update: FrameUpdate) -> usize {
        self.frames_tx.send(update).unwrap_or(0)
    }

    /// Record `text` in the commentary log and broadcast it.
    ///
    /// The log keeps the most recent entries only; the oldest entry is
    /// evicted once the cap is reached.
    pub async fn publish_commentary(&self, text: impl Into<String>) -> CommentaryEntry {
        let entry = CommentaryEntry::now(text);
        {
            let mut log = self.commentary_log.write().await;
            if log.len() >= COMMENTARY_LOG_CAP {
                log.pop_front();
            }
            log.push_back(entry.clone());
        }
        self.commentary_tx.send(entry.clone()).unwrap_or(0);
        entry
    }

    /// Snapshot of the retained commentary, oldest first.
    pub async fn commentary(&self) -> Vec<CommentaryEntry> {
        self.commentary_log.read().await.iter().cloned().collect()
    }
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kanto_types::{GameState, ScreenContext};

    use super::*;

    fn update(location: &str) -> StateUpdate {
        StateUpdate {
            state: GameState {
                location: location.to_string(),
                badges: 0,
                money: 3000,
                team: vec![],
                items: vec![],
                context: ScreenContext::Overworld,
            },
            active_policy: "Scout (player)".to_string(),
        }
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_not_an_error() {
        let hub = SessionHub::new();
        assert_eq!(hub.publish_state(update("PALLET TOWN")), 0);
        assert_eq!(
            hub.publish_frame(FrameUpdate {
                frame: vec![1, 2, 3],
                frame_count: 30,
            }),
            0
        );
    }

    #[tokio::test]
    async fn subscribers_receive_published_updates() {
        let hub = SessionHub::new();
        let mut states = hub.subscribe_states();
        let mut frames = hub.subscribe_frames();

        assert_eq!(hub.publish_state(update("VIRIDIAN CITY")), 1);
        hub.publish_frame(FrameUpdate {
            frame: vec![9],
            frame_count: 60,
        });

        assert_eq!(states.recv().await.unwrap().state.location, "VIRIDIAN CITY");
        assert_eq!(frames.recv().await.unwrap().frame_count, 60);
    }

    #[tokio::test]
    async fn commentary_is_logged_and_broadcast() {
        let hub = SessionHub::new();
        let mut rx = hub.subscribe_commentary();

        hub.publish_commentary("[Scout] heading north").await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.text, "[Scout] heading north");

        let log = hub.commentary().await;
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().unwrap().text, "[Scout] heading north");
    }

    #[tokio::test]
    async fn commentary_log_evicts_the_oldest_past_the_cap() {
        let hub = SessionHub::new();
        for index in 0..201_u32 {
            hub.publish_commentary(format!("entry {index}")).await;
        }

        let log = hub.commentary().await;
        assert_eq!(log.len(), 200);
        assert_eq!(log.first().unwrap().text, "entry 1");
        assert_eq!(log.last().unwrap().text, "entry 200");
    }
}
