use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(reqwest::Error),
    MissingField(String),
    MissingFeature(&'static str),
    MissingAction(&'static str),
    UnknownZoneMode(String),
    UnknownScale(String),
    Payload { path: String, message: String },
    Config(String),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Error {
    /// Transport failure, timeout or non-2xx response.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// The vendor answered, but not with a zone record we can use.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MissingField(_)
                | Error::MissingFeature(_)
                | Error::MissingAction(_)
                | Error::UnknownZoneMode(_)
                | Error::UnknownScale(_)
                | Error::Payload { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {e}"),
            Error::MissingField(path) => write!(f, "malformed payload: missing {path}"),
            Error::MissingFeature(name) => write!(f, "malformed payload: no {name:?} feature"),
            Error::MissingAction(name) => write!(f, "malformed payload: no {name:?} action"),
            Error::UnknownZoneMode(mode) => write!(f, "malformed payload: unknown zone mode {mode:?}"),
            Error::UnknownScale(scale) => write!(f, "malformed payload: unknown scale {scale:?}"),
            Error::Payload { path, message } => write!(f, "malformed payload at {path}: {message}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Error::Payload {
            path: e.path().to_string(),
            message: e.into_inner().to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
