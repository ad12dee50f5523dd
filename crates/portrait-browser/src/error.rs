use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for portrait_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Authentication(reason) => portrait_core::Error::Authentication(reason),
            other => portrait_core::Error::Session(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_stays_authentication() {
        let core: portrait_core::Error = Error::Authentication("rejected".to_string()).into();
        assert!(matches!(core, portrait_core::Error::Authentication(r) if r == "rejected"));
    }

    #[test]
    fn test_other_errors_become_session_errors() {
        let core: portrait_core::Error = Error::Cdp("socket closed".to_string()).into();
        assert!(matches!(core, portrait_core::Error::Session(r) if r.contains("socket closed")));
    }
}
