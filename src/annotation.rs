#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

//! GitHub Actions workflow commands.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Annotation {
    Warning {
        location: Option<Location>,
        message: String,
    },
    Notice(String),
    Error(String),
    Group(String),
    EndGroup,
}

impl Annotation {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning { location: None, message: message.into() }
    }

    pub fn warning_at(file: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        Self::Warning {
            location: Some(Location { file: file.into(), line }),
            message: message.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Warning { location: None, message } => write!(f, "::warning::{message}"),
            Annotation::Warning { location: Some(loc), message } => {
                write!(f, "::warning file={},line={}::{message}", loc.file, loc.line)
            }
            Annotation::Notice(message) => write!(f, "::notice::{message}"),
            Annotation::Error(message) => write!(f, "::error::{message}"),
            Annotation::Group(title) => write!(f, "::group::{title}"),
            Annotation::EndGroup => f.write_str("::endgroup::"),
        }
    }
}
