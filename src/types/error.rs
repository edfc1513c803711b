use http::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Possible errors when querying the upstream API.
///
/// Every variant is terminal for a run: the source surfaces it as a single
/// `Error`-kind item on the result stream and never retries.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Network error while talking to the upstream endpoint, including
    /// connect failures and request timeouts.
    #[error("Network error while querying the upstream API")]
    Transport(#[from] reqwest::Error),
    /// The upstream endpoint answered with a non-success HTTP status.
    #[error("Unexpected status code {0} from the upstream API")]
    UnexpectedStatus(StatusCode),
    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode the upstream response body")]
    Decode(#[from] serde_json::Error),
    /// The upstream API reported a failure of its own (nonzero `code`),
    /// e.g. an invalid token or an exhausted quota.
    #[error("Upstream API failure (code {code}): {message}")]
    Upstream {
        /// Nonzero response code from the API
        code: i64,
        /// Upstream `message` field
        message: String,
    },
    /// The configured credential cannot be used as an HTTP header value.
    #[error("API key could not be used as a header value")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(e1), Self::Transport(e2)) => e1.to_string() == e2.to_string(),
            (Self::UnexpectedStatus(s1), Self::UnexpectedStatus(s2)) => s1 == s2,
            (Self::Decode(e1), Self::Decode(e2)) => e1.to_string() == e2.to_string(),
            (
                Self::Upstream {
                    code: c1,
                    message: m1,
                },
                Self::Upstream {
                    code: c2,
                    message: m2,
                },
            ) => c1 == c2 && m1 == m2,
            (Self::InvalidHeader(_), Self::InvalidHeader(_)) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}

impl Serialize for ErrorKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
