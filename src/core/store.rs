use crate::core::codec::RosterCodec;
use crate::core::Storage;
use crate::domain::model::{Member, Roster};

/// Loads and saves rosters through a [`Storage`]. Failures never propagate:
/// a failed load is `None`, a failed save is `false`, both logged.
pub struct RosterStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RosterStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn load(&self, path: &str) -> Option<Roster> {
        let bytes = match self.storage.read_file(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Could not read roster file '{}': {}", path, e);
                return None;
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let roster = RosterCodec::decode(&text);
        match &roster {
            Some(roster) => tracing::info!(
                "Loaded {} members of '{}' from {}",
                roster.len(),
                roster.name(),
                path
            ),
            None => tracing::warn!("Roster file '{}' contains no members", path),
        }
        roster
    }

    /// Rewrites the whole file.
    pub async fn save<M: Member>(&self, roster: &Roster<M>, path: &str) -> bool {
        let text = RosterCodec::encode(roster);
        match self.storage.write_file(path, text.as_bytes()).await {
            Ok(()) => {
                tracing::info!("Saved {} members of '{}' to {}", roster.len(), roster.name(), path);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save roster to '{}': {}", path, e);
                false
            }
        }
    }
}
