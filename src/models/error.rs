use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Display, Serialize, Deserialize, Clone, Debug)]
pub enum Error {
    #[display("invalid mod definition: {_0}")]
    InvalidModDefinition(String),
    #[display("parse error: {_0}")]
    ParseError(String),
    #[display("io error: {_0}")]
    IOError(String),
    #[display("mod not found: {_0}")]
    ModNotFound(String),
    #[display("modpack already exists: {_0}")]
    PackExists(String),
    #[display("modpack not found: {_0}")]
    PackNotFound(String),
    #[display("failed to launch process: {_0}")]
    ProcessLaunch(String),
    #[display("unexpected error")]
    Unexpected,
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IOError(e.to_string())
    }
}

impl From<semver::Error> for Error {
    fn from(e: semver::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ParseError(e.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Error::IOError(e.to_string())
    }
}

impl From<camino::FromPathBufError> for Error {
    fn from(e: camino::FromPathBufError) -> Self {
        Error::ParseError(e.to_string())
    }
}
