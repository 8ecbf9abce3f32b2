//! Crate-wide error type.
//!
//! Every failure is tagged as either a startup failure, which must stop the
//! process before polling begins, or a cycle-local failure, which only ends the
//! current poll iteration.
use thiserror::Error;

use crate::config::ConfigError;
use crate::practicum::FetchError;
use crate::response::ResponseError;
use crate::status::StatusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Startup,
    CycleLocal,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Startup,
            Error::Fetch(_) | Error::Response(_) | Error::Status(_) => ErrorKind::CycleLocal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_fatal() {
        let err = Error::from(ConfigError::Missing("PRACTICUM_TOKEN"));
        assert_eq!(err.kind(), ErrorKind::Startup);
    }

    #[test]
    fn poll_errors_are_cycle_local() {
        assert_eq!(Error::from(ResponseError::MissingKey).kind(), ErrorKind::CycleLocal);
        assert_eq!(
            Error::from(StatusError::Unknown("done".into())).kind(),
            ErrorKind::CycleLocal
        );
    }

    #[test]
    fn display_is_transparent() {
        let err = Error::from(StatusError::MissingField("status"));
        assert_eq!(err.to_string(), StatusError::MissingField("status").to_string());
    }
}
