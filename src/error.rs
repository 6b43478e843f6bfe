use std::io;
use thiserror::Error;

/// Where unexpected failures should be reported.
pub const REPORT_URL: &str = "https://github.com/Itz-fork/Gofile2/issues";

/// Guidance attached to [`Error::InvalidToken`] when Gofile rejects a token.
pub const WRONG_TOKEN_GUIDANCE: &str =
    "Invalid Gofile token, get your Gofile token from --> https://gofile.io/myProfile";

const MISSING_TOKEN: &str = "Token is required for this action but none was given";

pub type Result<T> = std::result::Result<T, Error>;

/// Error used by the entire crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The token is missing or Gofile reported it as wrong.
    #[error("{0}")]
    InvalidToken(String),
    /// The local file or directory does not exist.
    #[error("{0}")]
    InvalidPath(String),
    /// `set_option` was given a name outside the known options.
    #[error("{0} doesn't appear to be a valid option")]
    InvalidOption(String),
    /// Gofile answered with a status other than `ok`.
    #[error("{0}")]
    ResponseError(String),
    /// A wrapped operation failed during or after I/O.
    #[error("Error happened: {0}\n\nReport this at ----> https://github.com/Itz-fork/Gofile2/issues")]
    JobFailed(#[source] Box<Error>),

    #[error("Reqwest error: {0:?}")]
    Http(#[from] reqwest::Error),
    #[error("Serde JSON parsing error: {0:?}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A field the client relies on was absent from the response.
    #[error("missing `{0}` in response")]
    MissingField(&'static str),
}

impl Error {
    pub(crate) fn missing_token() -> Self {
        Self::InvalidToken(MISSING_TOKEN.to_owned())
    }

    pub(crate) fn wrong_token() -> Self {
        Self::InvalidToken(WRONG_TOKEN_GUIDANCE.to_owned())
    }

    pub(crate) fn job_failed(cause: Error) -> Self {
        Self::JobFailed(Box::new(cause))
    }

    /// The innermost error, looking through any [`Error::JobFailed`] layers.
    pub fn cause(&self) -> &Error {
        match self {
            Self::JobFailed(inner) => inner.cause(),
            other => other,
        }
    }

    /// Whether calling again with the same input could succeed.
    ///
    /// Validation failures never do; everything else depends on the remote side.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self.cause(),
            Self::InvalidToken(_) | Self::InvalidPath(_) | Self::InvalidOption(_)
        )
    }
}
