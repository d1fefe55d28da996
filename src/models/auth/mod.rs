pub mod entities;
pub mod requests;
pub mod responses;
pub mod session;

pub use entities::CurrentUser;
pub use requests::{LoginRequest, RegisterRequest};
pub use responses::{LoginResponse, RefreshTokenResponse, SessionResponse, UserInfoResponse};
pub use session::{SessionChange, SessionEvent, SessionState};
