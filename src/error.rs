use std::{
    io,
    path::{Path, PathBuf},
    str::Utf8Error,
};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{
    direction::UnknownDirection,
    reading::{ParseReadingError, ReadingErrorKind},
};

pub type Result<T, E = AggregateError> = std::result::Result<T, E>;

/// Coarse classification of an [`AggregateError`], for callers that only
/// need to tell a file problem from a content problem from an empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    File,
    Content,
    Empty,
}

#[derive(Debug, Error, Diagnostic)]
pub enum AggregateError {
    #[error("Could not read {}", path.display())]
    #[diagnostic(code(meteo::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed reading at {}:{line}: {kind}", path.display())]
    #[diagnostic(
        code(meteo::malformed),
        help("expected `Station: _, Lat: _, Long: _, Date: _, Time: _, Temp: _, Humidity: _, Pressure: _, Wind: speed,direction`")
    )]
    Malformed {
        path: PathBuf,
        line: usize,
        kind: ReadingErrorKind,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("Unknown wind direction `{direction}` at {}:{line}", path.display())]
    #[diagnostic(
        code(meteo::direction),
        help("wind directions are one of N, NNE, NE, ENE, E, ESE, SE, SSE, S, SSW, SW, WSW, W, WNW, NW, NNW")
    )]
    UnknownDirection {
        path: PathBuf,
        line: usize,
        direction: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unknown direction")]
        span: SourceSpan,
    },

    #[error("No readings in {}", path.display())]
    #[diagnostic(code(meteo::empty), help("the file is empty or only contains blank lines"))]
    NoReadings { path: PathBuf },
}

impl AggregateError {
    /// Wraps the failure to parse line number `line` (1-based) of `path`,
    /// whose trimmed content is `text`.
    pub(crate) fn bad_line(path: &Path, line: usize, text: &str, error: ParseReadingError) -> Self {
        let src = NamedSource::new(format!("{}:{line}", path.display()), text.to_string());
        let span = SourceSpan::from(error.span);

        match error.kind {
            ReadingErrorKind::UnknownDirection(UnknownDirection(direction)) => {
                Self::UnknownDirection {
                    path: path.to_path_buf(),
                    line,
                    direction,
                    src,
                    span,
                }
            }
            kind => Self::Malformed {
                path: path.to_path_buf(),
                line,
                kind,
                src,
                span,
            },
        }
    }

    /// Line number `line` of `path` is not valid UTF-8.
    pub(crate) fn not_utf8(path: &Path, line: usize, bytes: &[u8], error: Utf8Error) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let start = error.valid_up_to();
        let span = start..start + char::REPLACEMENT_CHARACTER.len_utf8();

        Self::bad_line(
            path,
            line,
            text.trim_end(),
            ParseReadingError {
                kind: ReadingErrorKind::InvalidUtf8,
                span,
            },
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::File,
            Self::Malformed { .. } | Self::UnknownDirection { .. } => ErrorKind::Content,
            Self::NoReadings { .. } => ErrorKind::Empty,
        }
    }

    /// Line the error was found on, when it comes from the content of the file.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Malformed { line, .. } | Self::UnknownDirection { line, .. } => Some(*line),
            Self::Io { .. } | Self::NoReadings { .. } => None,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Malformed { path, .. }
            | Self::UnknownDirection { path, .. }
            | Self::NoReadings { path } => path,
        }
    }
}
