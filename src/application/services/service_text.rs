//! Text of service notices.

use crate::domain::entities::{HISTORY_CLEARED_TEXT, PeerId, ServiceAction};
use crate::domain::ports::PeerDirectory;

/// Text of the notice replacing a payload with nothing to show.
pub const EMPTY_MESSAGE_TEXT: &str = "Empty message";

const UNKNOWN_NAME: &str = "Deleted Account";

pub struct ServiceTextService;

impl ServiceTextService {
    /// Renders the notice for `action` performed by `from`.
    #[must_use]
    pub fn text(action: &ServiceAction, from: PeerId, peers: &dyn PeerDirectory) -> String {
        let name = |id: PeerId| {
            peers
                .peer(id)
                .map_or_else(|| UNKNOWN_NAME.to_string(), |peer| peer.name().to_string())
        };
        match action {
            ServiceAction::Empty => EMPTY_MESSAGE_TEXT.to_string(),
            ServiceAction::ExpiredMedia { video: false } => "Photo has expired".to_string(),
            ServiceAction::ExpiredMedia { video: true } => "Video has expired".to_string(),
            ServiceAction::PinMessage { .. } => format!("{} pinned a message", name(from)),
            ServiceAction::HistoryClear => HISTORY_CLEARED_TEXT.to_string(),
            ServiceAction::ChatCreate { title } => {
                format!("{} created the group \u{ab}{title}\u{bb}", name(from))
            }
            ServiceAction::ChannelCreate { title } => {
                format!("Channel \u{ab}{title}\u{bb} created")
            }
            ServiceAction::ChatEditTitle { title } => {
                format!("{} changed the group name to \u{ab}{title}\u{bb}", name(from))
            }
            ServiceAction::ChatAddUser { users } if matches!(users.as_slice(), [only] if *only == from) => {
                format!("{} joined the group", name(from))
            }
            ServiceAction::ChatAddUser { users } => {
                let added = users.iter().map(|id| name(*id)).collect::<Vec<_>>();
                format!("{} added {}", name(from), join_names(&added))
            }
            ServiceAction::ChatDeleteUser { user } if *user == from => {
                format!("{} left the group", name(from))
            }
            ServiceAction::ChatDeleteUser { user } => {
                format!("{} removed {}", name(from), name(*user))
            }
            ServiceAction::ChatJoinedByLink => {
                format!("{} joined the group via invite link", name(from))
            }
            ServiceAction::ChatMigrateTo { .. } | ServiceAction::ChannelMigrateFrom { .. } => {
                "The group was upgraded to a supergroup".to_string()
            }
            ServiceAction::ScreenshotTaken => format!("{} took a screenshot", name(from)),
            ServiceAction::Custom { message } => message.clone(),
            ServiceAction::Unknown => "This action is not supported".to_string(),
        }
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [single] => single.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Peer, PeerCache};

    fn peers() -> PeerCache {
        let cache = PeerCache::new();
        cache.extend([
            Peer::user(1_u64, "Alice"),
            Peer::user(2_u64, "Bob"),
            Peer::user(3_u64, "Carol"),
        ]);
        cache
    }

    #[test]
    fn test_add_users() {
        let peers = peers();
        let joined = ServiceAction::ChatAddUser {
            users: vec![PeerId(2)],
        };
        assert_eq!(
            ServiceTextService::text(&joined, PeerId(2), &peers),
            "Bob joined the group"
        );

        let added = ServiceAction::ChatAddUser {
            users: vec![PeerId(2), PeerId(3), PeerId(9)],
        };
        assert_eq!(
            ServiceTextService::text(&added, PeerId(1), &peers),
            "Alice added Bob, Carol and Deleted Account"
        );
    }

    #[test]
    fn test_leave_and_remove() {
        let peers = peers();
        assert_eq!(
            ServiceTextService::text(
                &ServiceAction::ChatDeleteUser { user: PeerId(1) },
                PeerId(1),
                &peers
            ),
            "Alice left the group"
        );
        assert_eq!(
            ServiceTextService::text(
                &ServiceAction::ChatDeleteUser { user: PeerId(3) },
                PeerId(1),
                &peers
            ),
            "Alice removed Carol"
        );
    }

    #[test]
    fn test_fixed_notices() {
        let peers = peers();
        assert_eq!(
            ServiceTextService::text(&ServiceAction::Empty, PeerId(1), &peers),
            EMPTY_MESSAGE_TEXT
        );
        assert_eq!(
            ServiceTextService::text(&ServiceAction::ExpiredMedia { video: true }, PeerId(1), &peers),
            "Video has expired"
        );
    }
}
