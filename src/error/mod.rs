// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Error handling module.
//!
//! ```text
//!                BotError (~24 bytes)
//!                       |
//!   +-----+------+------+-----+-----+------+----+----------+
//!   |     |      |      |     |     |      |    |          |
//!   v     v      v      v     v     v      v    v          v
//!  Nbt Structure Pack  Net   Cfg  Store Transl  Fs    Io/Other
//!  Box   Box     Box   Box   Box   Box   Box   Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Nbt        UnknownTag, UnexpectedEof, MissingTag, WrongType
//!   Structure  InvalidSize, IndexCount, PaletteIndex, Identifier
//!   Pack       InvalidManifest, Duplicate, MissingLevelVersions
//!   Network    Reqwest, HttpError, InvalidUrl
//!   Config     ParseError, MissingKey, InvalidValue
//!   Store      Backend, Serialize
//!   Translate  UnsupportedLocale, Api
//!   Fs         NotFound, Archive, IoError
//!
//! All variants boxed => BotError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BotError`].
pub type BotResult<T> = std::result::Result<T, BotError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BotError {
    /// NBT decoding or encoding failed.
    #[error("nbt error: {0}")]
    Nbt(#[from] Box<NbtError>),

    /// Structure file is malformed.
    #[error("structure error: {0}")]
    Structure(#[from] Box<StructureError>),

    /// Pack or world generation failed.
    #[error("pack error: {0}")]
    Pack(#[from] Box<PackError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Document store error.
    #[error("store error: {0}")]
    Store(#[from] Box<StoreError>),

    /// Translation error.
    #[error("translate error: {0}")]
    Translate(#[from] Box<TranslateError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl BotError {
    /// Create a [`BotError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BotError {
                fn from(err: $error) -> Self {
                    BotError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    NbtError => Nbt,
    StructureError => Structure,
    PackError => Pack,
    NetworkError => Network,
    ConfigError => Config,
    StoreError => Store,
    TranslateError => Translate,
    FsError => Fs,
    std::io::Error => Io,
}

// --- NBT Errors ---

/// Errors raised by the little-endian NBT codec.
#[derive(Debug, Error)]
pub enum NbtError {
    /// Tag id outside 0..=12.
    #[error("unknown tag id {0}")]
    UnknownTag(u8),

    /// Input ended in the middle of a tag.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A string payload was not valid UTF-8.
    #[error("invalid utf-8 in string tag")]
    InvalidUtf8,

    /// A length prefix was negative or too large.
    #[error("invalid length {0}")]
    InvalidLength(i64),

    /// The root tag is not a compound.
    #[error("root tag must be a compound, found {0}")]
    RootNotCompound(&'static str),

    /// Nesting exceeded the depth limit.
    #[error("nesting depth exceeds {0}")]
    TooDeep(usize),

    /// A list contained elements of another type.
    #[error("list of {expected} contains {found}")]
    MixedList {
        expected: &'static str,
        found: &'static str,
    },

    /// level.dat header length disagrees with the payload.
    #[error("level.dat header declares {declared} bytes, payload has {actual}")]
    HeaderLength { declared: i64, actual: usize },

    /// A required tag is missing.
    #[error("missing tag '{0}'")]
    MissingTag(String),

    /// A tag has an unexpected type.
    #[error("tag '{name}' is {found}, expected {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Underlying reader or writer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// --- Structure Errors ---

/// Errors raised while interpreting a `.mcstructure` file.
#[derive(Debug, Error)]
pub enum StructureError {
    /// Size list is not three positive integers.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Coordinate list is not three integers.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// `format_version` is not positive.
    #[error("invalid format version {0}")]
    InvalidFormatVersion(i32),

    /// Number of block indices does not match the volume.
    #[error("expected {expected} block indices, found {found}")]
    IndexCount { expected: usize, found: usize },

    /// Block index points outside the palette.
    #[error("block index {index} out of palette range ({len} entries)")]
    PaletteIndex { index: i32, len: usize },

    /// Palette entry is invalid.
    #[error("invalid block: {0}")]
    InvalidBlock(String),

    /// Block version cannot be turned into a semantic version.
    #[error("invalid block version '{version}': {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// Identifier does not follow `namespace:path` rules.
    #[error("invalid identifier '{value}': {message}")]
    Identifier { value: String, message: String },

    /// Identifier pattern failed to compile.
    #[error("identifier pattern: {0}")]
    Pattern(#[source] regex::Error),
}

// --- Pack Errors ---

/// Errors raised while generating packs and worlds.
#[derive(Debug, Error)]
pub enum PackError {
    /// Manifest violates Bedrock manifest rules.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Manifest JSON could not be read or written.
    #[error("manifest json: {0}")]
    Json(#[from] serde_json::Error),

    /// Two inputs share the same identifier.
    #[error("duplicate structure identifier '{0}'")]
    Duplicate(String),

    /// No structure files were supplied.
    #[error("no structure files supplied")]
    Empty,

    /// Level version data has not been provided yet.
    #[error("level versions are not available")]
    MissingLevelVersions,

    /// Level version data is out of range.
    #[error("invalid level versions: {0}")]
    InvalidLevelVersions(String),
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// I/O error during download.
    #[error("io error during download: {0}")]
    Io(#[from] std::io::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Store Errors ---

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failed to load or save a document.
    #[error("backend failed on '{name}': {message}")]
    Backend { name: String, message: String },

    /// Value could not be converted to or from JSON.
    #[error("document '{name}' json: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

// --- Translate Errors ---

/// Translation errors.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Locale has no DeepL target language.
    #[error("locale '{0}' is not supported by DeepL")]
    UnsupportedLocale(String),

    /// DeepL answered with an error status.
    #[error("deepl api returned {status}: {message}")]
    Api { status: u16, message: String },

    /// DeepL answered without any translation.
    #[error("deepl api returned no translations")]
    EmptyResponse,

    /// Version pattern failed to compile.
    #[error("version pattern: {0}")]
    Pattern(#[source] regex::Error),
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path or archive entry not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Archive entry path escapes the archive root.
    #[error("unsafe archive path: {0}")]
    UnsafePath(String),

    /// Zip archive error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
