//! Locations of remote and fallback documents.
//!
//! A location is either an HTTP(S) URL or a filesystem path. `file://` URLs
//! are normalized to paths so fetchers only ever see the two cases.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::error::LocationError;

/// Where a document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Fetched over HTTP or HTTPS.
    Http(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl Location {
    /// Parses a URI or bare filesystem path.
    ///
    /// `http://` and `https://` URLs become [`Location::Http`]. `file://`
    /// URLs and anything that does not parse as an absolute URL become
    /// [`Location::File`]. Other schemes are rejected.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LocationError::Empty);
        }

        match Url::parse(input) {
            Ok(url) => Self::from_url(url),
            // Relative paths and plain file names are not URLs.
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::File(PathBuf::from(input))),
            Err(e) => Err(LocationError::InvalidUrl {
                input: input.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Converts an already-parsed URL.
    pub fn from_url(url: Url) -> Result<Self, LocationError> {
        match url.scheme() {
            "http" | "https" => Ok(Self::Http(url)),
            "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| LocationError::InvalidUrl {
                    input: url.to_string(),
                    message: "file URL does not map to a local path".to_string(),
                }),
            // Single-letter schemes are Windows drive letters (`C:\...`).
            scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(url.as_str()))),
            scheme => Err(LocationError::UnsupportedScheme {
                scheme: scheme.to_string(),
            }),
        }
    }

    /// Returns the filesystem path for file locations.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Http(_) => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
