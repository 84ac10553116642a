/// Error types for dictionary acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The dictionary file or resource does not exist
    NotFound(String),
    /// Filesystem error other than a missing file
    Io(String),
    /// Transport error while fetching a remote dictionary
    Network(String),
    /// Remote server answered with a non-success status
    HttpStatus(u16, String),
    /// The dictionary is not valid JSON
    InvalidJson(String),
    /// Valid JSON, but not an object of message templates
    InvalidShape(String),
    /// The configured text encoding cannot be decoded
    UnsupportedEncoding(String),
    /// The locale identifier cannot name a dictionary
    InvalidLocale(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotFound(msg) => write!(f, "Dictionary not found: {}", msg),
            LoadError::Io(msg) => write!(f, "I/O error: {}", msg),
            LoadError::Network(msg) => write!(f, "Network error: {}", msg),
            LoadError::HttpStatus(status, msg) => write!(f, "HTTP status {}: {}", status, msg),
            LoadError::InvalidJson(msg) => write!(f, "Dictionary is not valid JSON: {}", msg),
            LoadError::InvalidShape(msg) => write!(f, "Invalid dictionary: {}", msg),
            LoadError::UnsupportedEncoding(enc) => write!(f, "Unsupported encoding: {}", enc),
            LoadError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(err.to_string()),
            _ => LoadError::Io(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::InvalidJson(err.to_string())
    }
}

/// Result type for dictionary loading
pub type LoadResult<T> = Result<T, LoadError>;
