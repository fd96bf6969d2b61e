pub mod category;
pub mod classification;
pub mod colors;
pub mod detail;
pub mod error;
pub mod format;
pub mod geo;
pub mod inset;
pub mod interaction;
pub mod record;
pub mod retry;
pub mod route;
pub mod session;
pub mod style;

pub use category::PoliticalCategory;
pub use classification::{ClassificationTable, MergeReport};
pub use colors::color_of;
pub use detail::{ContentSection, DocumentSync, StateDetail, StatesDetailDocument};
pub use error::{FetchError, LookupError, SectionError, SessionError};
pub use inset::show_insets;
pub use interaction::{Disposition, InteractionController, InteractionPhase, MapEvent};
pub use record::{StateRecord, StateRecordPatch, StatesSummary};
pub use route::{Route, state_slug};
pub use session::{SessionGuard, SessionState, SessionToken};
pub use style::{BorderDash, FeatureStyle, style_of};

/// Request body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "expiresAt", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// Shortest password accepted by `POST /api/auth/change-password`.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Request body of `POST /api/auth/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Error payload returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
