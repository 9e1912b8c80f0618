//! Reservation service client error types.

use std::fmt;

/// Server message returned when the requested date is outside the presale window.
pub(crate) const DATE_OUT_OF_RANGE_MESSAGE: &str = "选择的查询日期不在预售日期范围内";

/// Errors from the reservation service HTTP client.
#[derive(Debug)]
pub enum RailError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-success HTTP status
    ApiError { status: u16, message: String },

    /// The service answered with `-1`, its reply to malformed parameters
    InvalidParameters,

    /// The queried date is outside the presale window
    DateOutOfRange,

    /// The service answered `status: false`
    Rejected(Vec<String>),

    /// The envelope reported success but carried no payload
    MissingData,
}

impl RailError {
    /// Classify a `status: false` envelope by its messages.
    pub(crate) fn from_messages(messages: Vec<String>) -> Self {
        if messages.iter().any(|m| m == DATE_OUT_OF_RANGE_MESSAGE) {
            RailError::DateOutOfRange
        } else {
            RailError::Rejected(messages)
        }
    }
}

impl fmt::Display for RailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailError::Http(e) => write!(f, "HTTP error: {e}"),
            RailError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RailError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            RailError::InvalidParameters => write!(f, "invalid query parameters"),
            RailError::DateOutOfRange => write!(f, "date is outside the presale range"),
            RailError::Rejected(messages) => {
                write!(f, "request rejected: {}", messages.join("; "))
            }
            RailError::MissingData => write!(f, "response carried no data"),
        }
    }
}

impl std::error::Error for RailError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RailError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RailError {
    fn from(err: reqwest::Error) -> Self {
        RailError::Http(err)
    }
}
