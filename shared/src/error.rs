use thiserror::Error;

/// Classification miss. Callers recover with the neutral default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no state or territory named {0:?}")]
    NotFound(String),
}

/// Failures surfaced by the retry-fetch client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The backend rejected the credential. The stored session has already
    /// been purged and the login redirect issued when this is returned.
    #[error("unauthorized")]
    Unauthorized,
    #[error("server unavailable after {attempts} attempts (last status {last_status})")]
    ServerUnavailable { attempts: u32, last_status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short text for the inline error panel of the view that issued the request.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Unauthorized => "Your session has expired. Please log in again.".into(),
            FetchError::ServerUnavailable { .. } => {
                "The server is not responding. Please try again later.".into()
            }
            FetchError::Network(_) => "Network unavailable. Check your connection.".into(),
            FetchError::Decode(_) => "The server sent an unexpected response.".into(),
        }
    }
}

/// Rejected edits to a state's content sections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("section title must not be empty")]
    EmptyTitle,
    #[error("cannot delete the last remaining section")]
    LastSection,
    #[error("no section with id {0:?}")]
    UnknownSection(String),
    #[error("a state must keep at least one section")]
    NoSections,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("token must not be empty")]
    EmptyToken,
    #[error("credential storage unavailable: {0}")]
    Storage(String),
}
