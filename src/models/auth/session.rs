//! 会话状态机
//!
//! ```text
//! Unauthenticated --SignedIn--> AuthenticatedRoleUnknown --RoleResolved--> AuthenticatedStudent
//!                                                                      \-> AuthenticatedTeacher
//! Authenticated* --SignedOut--> Unauthenticated
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "auth.ts")]
pub enum SessionState {
    #[default]
    Unauthenticated,
    AuthenticatedRoleUnknown,
    AuthenticatedStudent,
    AuthenticatedTeacher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    RoleResolved(UserRole),
    SignedOut,
}

impl SessionState {
    /// 应用一个事件；不在转移表中的组合保持原状态
    pub fn apply(self, event: SessionEvent) -> Self {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (_, SignedOut) => Unauthenticated,
            (Unauthenticated, SignedIn) => AuthenticatedRoleUnknown,
            (AuthenticatedRoleUnknown, RoleResolved(UserRole::Student)) => AuthenticatedStudent,
            (AuthenticatedRoleUnknown, RoleResolved(UserRole::Teacher)) => AuthenticatedTeacher,
            (state, _) => state,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        *self != SessionState::Unauthenticated
    }

    pub fn role(&self) -> Option<UserRole> {
        match self {
            SessionState::AuthenticatedStudent => Some(UserRole::Student),
            SessionState::AuthenticatedTeacher => Some(UserRole::Teacher),
            _ => None,
        }
    }
}

/// 会话变更通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionChange {
    pub user_id: i64,
    pub state: SessionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_then_resolve() {
        let state = SessionState::default().apply(SessionEvent::SignedIn);
        assert_eq!(state, SessionState::AuthenticatedRoleUnknown);
        assert_eq!(state.role(), None);
        assert!(state.is_authenticated());

        let teacher = state.apply(SessionEvent::RoleResolved(UserRole::Teacher));
        assert_eq!(teacher, SessionState::AuthenticatedTeacher);
        let student = state.apply(SessionEvent::RoleResolved(UserRole::Student));
        assert_eq!(student.role(), Some(UserRole::Student));
    }

    #[test]
    fn test_sign_out_from_any_state() {
        for state in [
            SessionState::Unauthenticated,
            SessionState::AuthenticatedRoleUnknown,
            SessionState::AuthenticatedStudent,
            SessionState::AuthenticatedTeacher,
        ] {
            assert_eq!(
                state.apply(SessionEvent::SignedOut),
                SessionState::Unauthenticated
            );
        }
    }

    #[test]
    fn test_ignored_transitions() {
        // 未登录时解析角色无效
        assert_eq!(
            SessionState::Unauthenticated.apply(SessionEvent::RoleResolved(UserRole::Teacher)),
            SessionState::Unauthenticated
        );
        // 角色确定后不可再被改写
        assert_eq!(
            SessionState::AuthenticatedStudent.apply(SessionEvent::RoleResolved(UserRole::Teacher)),
            SessionState::AuthenticatedStudent
        );
        assert_eq!(
            SessionState::AuthenticatedTeacher.apply(SessionEvent::SignedIn),
            SessionState::AuthenticatedTeacher
        );
    }
}
