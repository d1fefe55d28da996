//! 会话变更通知

use tokio::sync::broadcast;
use tracing::debug;

use crate::models::auth::{SessionChange, SessionEvent, SessionState};
use crate::models::users::entities::UserRole;

const SESSION_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct SessionHub {
    sender: broadcast::Sender<SessionChange>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.sender.subscribe()
    }

    /// 登录成功：Unauthenticated -> RoleUnknown -> 按角色落定
    pub fn signed_in(&self, user_id: i64, role: UserRole) -> SessionState {
        let unresolved = SessionState::Unauthenticated.apply(SessionEvent::SignedIn);
        self.publish(user_id, unresolved);
        let resolved = unresolved.apply(SessionEvent::RoleResolved(role));
        self.publish(user_id, resolved);
        resolved
    }

    pub fn signed_out(&self, user_id: i64, from: SessionState) -> SessionState {
        let state = from.apply(SessionEvent::SignedOut);
        self.publish(user_id, state);
        state
    }

    fn publish(&self, user_id: i64, state: SessionState) {
        // 没有订阅者时发送失败，忽略即可
        if self.sender.send(SessionChange { user_id, state }).is_err() {
            debug!("No session subscribers for user {}", user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_publishes_both_steps() {
        let hub = SessionHub::new();
        let mut rx = hub.subscribe();

        let state = hub.signed_in(7, UserRole::Teacher);
        assert_eq!(state, SessionState::AuthenticatedTeacher);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.state, SessionState::AuthenticatedRoleUnknown);
        let second = rx.recv().await.unwrap();
        assert_eq!(
            second,
            SessionChange {
                user_id: 7,
                state: SessionState::AuthenticatedTeacher
            }
        );
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_unauthenticated() {
        let hub = SessionHub::new();
        let mut rx = hub.subscribe();

        let state = hub.signed_out(3, SessionState::AuthenticatedStudent);
        assert_eq!(state, SessionState::Unauthenticated);
        assert_eq!(rx.recv().await.unwrap().state, SessionState::Unauthenticated);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = SessionHub::default();
        assert_eq!(
            hub.signed_in(1, UserRole::Student),
            SessionState::AuthenticatedStudent
        );
    }
}
