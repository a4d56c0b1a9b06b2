//! Error types for folio operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a conversion run.
///
/// Content-shape surprises (unknown tags or classes) are not errors; they are
/// reported as [`Diagnostic`](crate::latex::Diagnostic)s instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image conversion failed for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid value {value:?} for attribute `{name}`")]
    InvalidAttribute { name: &'static str, value: String },

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("no sectioning command for heading depth {0}")]
    HeadingDepth(usize),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
