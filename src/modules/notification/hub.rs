use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::modules::notification::schema::NotificationEntity;

/// In-process fan-out of freshly inserted notifications to open client
/// streams. Each signed-in session holds one subscription, filtered to its
/// own user id; dropping or unsubscribing closes the channel.
#[derive(Clone, Default)]
pub struct NotificationHub {
    sessions: Arc<Mutex<HashMap<String, HashMap<Uuid, UnboundedSender<NotificationEntity>>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, user_id: &str) -> (Uuid, UnboundedReceiver<NotificationEntity>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session_id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.entry(user_id.to_string()).or_default().insert(session_id, tx);
        tracing::debug!("Notification stream {} opened for user {}", session_id, user_id);

        (session_id, rx)
    }

    pub fn unsubscribe(&self, user_id: &str, session_id: Uuid) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(user_sessions) = sessions.get_mut(user_id) {
            user_sessions.remove(&session_id);
            if user_sessions.is_empty() {
                sessions.remove(user_id);
            }
        }
        tracing::debug!("Notification stream {} closed for user {}", session_id, user_id);
    }

    /// Deliver to every open session of the recipient. Sessions whose
    /// receiver has gone away are pruned on the spot.
    pub fn publish(&self, notification: &NotificationEntity) {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(user_sessions) = sessions.get_mut(&notification.user_id) {
            user_sessions.retain(|_, tx| tx.send(notification.clone()).is_ok());
            if user_sessions.is_empty() {
                sessions.remove(&notification.user_id);
            }
        }
    }

    #[cfg(test)]
    pub fn session_count(&self, user_id: &str) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.get(user_id).map_or(0, HashMap::len)
    }
}
