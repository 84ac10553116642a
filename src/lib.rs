//! Localization with precompiled message templates
//!
//! A locale dictionary maps message keys to templates written as arrays of
//! strings. Each element may start with control symbols:
//!
//! - `#`: the rest is a placeholder name, substituted at render time
//! - `$`: no space is appended after this element
//! - `~`: escape: the next character is literal even if it is `#`, `$` or `~`
//!
//! Templates are compiled once per load into [`Segment`]s, and rendering is a
//! single pass over the segments.
//!
//! ```ignore
//! use localize::{LocaleRegistry, loader::FileSource};
//! use std::collections::HashMap;
//!
//! #[tokio::main]
//! async fn main() {
//!     // locales/en.json: {"greeting": ["Hello,", "#$name", "$!"]}
//!     let registry = LocaleRegistry::load(&["en", "ru"], &FileSource::new("locales")).await;
//!     let subs = HashMap::from([("name", "World")]);
//!     assert_eq!(registry.get("greeting", &subs, "en"), "Hello, World!");
//! }
//! ```

pub mod client;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod interpolator;
pub mod loader;
pub mod locale;
pub mod preprocessor;
pub mod segment;
pub mod server;

#[cfg(test)]
mod integration_tests;

pub use client::{LoadState, Localizer};
pub use config::LocalizeConfig;
pub use dictionary::{CompiledDictionary, Dictionary, RawDictionary};
pub use error::{LoadError, LoadResult};
pub use interpolator::{SubstitutionMap, interpolate};
pub use loader::{DictionarySource, FileSource, HttpSource, MemorySource, load_dictionary};
pub use preprocessor::{
    AuthoringWarning, Classification, Preprocessor, classify_segment, preprocess_dictionary,
    preprocess_message,
};
pub use segment::{CompiledMessage, ControlSymbol, Segment, SegmentKind};
pub use server::{LocaleOutcome, LocaleRegistry};
