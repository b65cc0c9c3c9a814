pub type Result<T> = std::result::Result<T, Error>;

/// Failures that reach the caller.
///
/// Nothing here is fatal for the editor: the in-memory graph stays usable
/// whichever variant comes back.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dashboard store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("dashboard {id} not found")]
    DashboardNotFound { id: String },

    #[error("dashboard {id} is open and cannot be deleted")]
    CurrentDashboard { id: String },

    #[error("no dashboard is open")]
    NoDashboard,

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Whether retrying later may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}
