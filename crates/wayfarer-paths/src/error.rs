use std::fmt;

/// Why a request ended in [`CompleteState::Error`](crate::CompleteState::Error).
///
/// Each variant carries a human-readable reason. When a request fails more
/// than once the first kind is kept and later reasons are appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No acceptable node near a start or end point.
    EndpointResolution(String),
    /// The endpoints are not connected, or the search ran out of nodes.
    Unreachable(String),
    /// An internal limit was hit (expansion cap, runaway parent chain).
    InvariantViolation(String),
    /// A lifecycle phase was invoked out of order.
    InvalidRequestState(String),
}

impl SearchError {
    /// The reason text, including appended reasons.
    pub fn reason(&self) -> &str {
        match self {
            Self::EndpointResolution(r)
            | Self::Unreachable(r)
            | Self::InvariantViolation(r)
            | Self::InvalidRequestState(r) => r,
        }
    }

    fn reason_mut(&mut self) -> &mut String {
        match self {
            Self::EndpointResolution(r)
            | Self::Unreachable(r)
            | Self::InvariantViolation(r)
            | Self::InvalidRequestState(r) => r,
        }
    }

    /// Append the reason of `other`, keeping this error's kind.
    pub(crate) fn append(&mut self, other: &SearchError) {
        let r = self.reason_mut();
        r.push('\n');
        r.push_str(other.reason());
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointResolution(r) => write!(f, "endpoint resolution failed: {r}"),
            Self::Unreachable(r) => write!(f, "unreachable: {r}"),
            Self::InvariantViolation(r) => write!(f, "invariant violated: {r}"),
            Self::InvalidRequestState(r) => write!(f, "invalid request state: {r}"),
        }
    }
}

impl std::error::Error for SearchError {}
