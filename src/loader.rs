//! Dictionary acquisition
//!
//! A `DictionarySource` fetches the raw JSON text of `<locale>.json` from
//! somewhere: a directory on disk, an HTTP server, or memory. Loading is the
//! only fallible step; everything after it degrades softly.
//!
//! # Example
//!
//! ```ignore
//! use localize::loader::{FileSource, load_dictionary};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FileSource::new("locales");
//!     let raw = load_dictionary(&source, "en").await?;
//!     println!("{} messages", raw.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, error};

use crate::dictionary::RawDictionary;
use crate::error::{LoadError, LoadResult};
use crate::locale::validate_locale;

pub const DEFAULT_ENCODING: &str = "utf-8";

/// Generic trait for places a locale dictionary can be fetched from
#[async_trait]
pub trait DictionarySource: Send + Sync {
    /// Fetch the raw JSON text of the dictionary for `locale`
    async fn fetch(&self, locale: &str) -> LoadResult<String>;

    /// Human readable location, used in log lines
    fn describe(&self, locale: &str) -> String;
}

/// Fetch and parse the dictionary for `locale`.
pub async fn load_dictionary<S>(source: &S, locale: &str) -> LoadResult<RawDictionary>
where
    S: DictionarySource + ?Sized,
{
    validate_locale(locale)?;

    let content = source.fetch(locale).await.inspect_err(|e| {
        error!(locale, location = %source.describe(locale), "couldn't load locale dictionary: {}", e);
    })?;

    let raw = RawDictionary::from_json(&content).inspect_err(|e| {
        error!(locale, location = %source.describe(locale), "dictionary is not a correct .json file: {}", e);
    })?;

    debug!(locale, messages = raw.len(), "loaded locale dictionary");
    Ok(raw)
}

fn is_utf8_label(encoding: &str) -> bool {
    matches!(encoding.to_ascii_lowercase().as_str(), "utf-8" | "utf8")
}

/// Reads `<dir>/<locale>.json` from the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    encoding: String,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSource {
            dir: dir.into(),
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    /// Only UTF-8 labels are accepted; others fail each fetch.
    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{}.json", locale))
    }
}

#[async_trait]
impl DictionarySource for FileSource {
    async fn fetch(&self, locale: &str) -> LoadResult<String> {
        if !is_utf8_label(&self.encoding) {
            return Err(LoadError::UnsupportedEncoding(self.encoding.clone()));
        }

        let path = self.path_for(locale);
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io(format!("Failed to read file '{}': {}", path.display(), e)),
        })?;

        String::from_utf8(bytes).map_err(|e| {
            LoadError::Io(format!("'{}' is not valid {}: {}", path.display(), self.encoding, e))
        })
    }

    fn describe(&self, locale: &str) -> String {
        self.path_for(locale).display().to_string()
    }
}

/// Fetches `<base_url>/<locale>.json` over HTTP
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> LoadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LoadError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        HttpSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, locale: &str) -> String {
        format!("{}/{}.json", self.base_url, locale)
    }
}

#[async_trait]
impl DictionarySource for HttpSource {
    async fn fetch(&self, locale: &str) -> LoadResult<String> {
        let url = self.url_for(locale);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LoadError::HttpStatus(
                status.as_u16(),
                format!("{}: {}", url, error_text),
            ));
        }

        Ok(response.text().await?)
    }

    fn describe(&self, locale: &str) -> String {
        self.url_for(locale)
    }
}

/// In-memory dictionaries keyed by locale
///
/// Deterministic and network-free. Counts fetch attempts per locale and can
/// simulate slow sources.
#[derive(Debug, Default)]
pub struct MemorySource {
    dictionaries: HashMap<String, String>,
    delay_ms: u64,
    attempts: Mutex<HashMap<String, usize>>,
    total_attempts: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dictionary(mut self, locale: &str, json: &str) -> Self {
        self.dictionaries.insert(locale.to_string(), json.to_string());
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn attempts(&self, locale: &str) -> usize {
        self.attempts
            .lock()
            .map(|attempts| attempts.get(locale).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_attempts(&self) -> usize {
        self.total_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DictionarySource for MemorySource {
    async fn fetch(&self, locale: &str) -> LoadResult<String> {
        self.total_attempts.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut attempts) = self.attempts.lock() {
            *attempts.entry(locale.to_string()).or_insert(0) += 1;
        }

        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        self.dictionaries
            .get(locale)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(self.describe(locale)))
    }

    fn describe(&self, locale: &str) -> String {
        format!("memory:{}.json", locale)
    }
}
