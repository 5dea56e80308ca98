use thiserror::Error;

/// Everything that can go wrong while refreshing the dashboard.
///
/// None of these stop the refresh loop; the next scheduled tick is the retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("content refresh request timed out")]
    NetworkTimeout,
    #[error("content refresh request failed: {0}")]
    NetworkFailure(String),
    #[error("server available but failed returning content")]
    ServerReportedError,
    #[error("content response could not be decoded: {0}")]
    MalformedSnapshot(String),
    #[error("element '{0}' is already animating")]
    AnimationReentrancy(String),
}

impl DashboardError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NetworkTimeout
            | Self::NetworkFailure(_)
            | Self::ServerReportedError
            | Self::MalformedSnapshot(_)
            | Self::AnimationReentrancy(_) => true,
        }
    }

    /// Re-entrant animation requests are expected and never surfaced.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::AnimationReentrancy(_))
    }
}
