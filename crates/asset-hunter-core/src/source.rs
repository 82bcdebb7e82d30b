#![forbid(unsafe_code)]

//! Scan sources: where a batch of records comes from.
//!
//! Every source returns a typed [`ScanBatch`]. Sources are called from the
//! background scan task, so they must be `Send + Sync`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::batch::{ScanBatch, mock_batch};
use crate::record::{Category, OpportunityRecord, RawRecord, RecordError};

/// Errors produced while gathering a batch.
#[derive(Debug)]
pub enum SourceError {
    /// I/O error while reading a source file.
    Io { path: PathBuf, source: std::io::Error },
    /// The source file is not a JSON array of records.
    Json { path: PathBuf, message: String },
    /// A record failed boundary typing.
    Record(RecordError),
    /// The source was configured with an unusable target.
    InvalidTarget(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            SourceError::Json { path, message } => {
                write!(f, "invalid record file {}: {message}", path.display())
            }
            SourceError::Record(e) => write!(f, "invalid record: {e}"),
            SourceError::InvalidTarget(msg) => write!(f, "invalid scan target: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { source, .. } => Some(source),
            SourceError::Record(e) => Some(e),
            SourceError::Json { .. } | SourceError::InvalidTarget(_) => None,
        }
    }
}

impl From<RecordError> for SourceError {
    fn from(e: RecordError) -> Self {
        SourceError::Record(e)
    }
}

/// Something that can produce a batch of opportunity records.
pub trait ScanSource: Send + Sync {
    /// Short name used in logs and the status bar.
    fn name(&self) -> &str;

    /// Produce one batch. Called once per scan.
    fn scan(&self) -> Result<ScanBatch, SourceError>;
}

/// Constant three-record batch. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl ScanSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn scan(&self) -> Result<ScanBatch, SourceError> {
        Ok(mock_batch())
    }
}

/// Which finders a [`TargetSource`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanType {
    Github,
    Chrome,
    #[default]
    All,
}

impl ScanType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Chrome => "chrome",
            Self::All => "all",
        }
    }

    fn includes_github(self) -> bool {
        matches!(self, Self::Github | Self::All)
    }

    fn includes_chrome(self) -> bool {
        matches!(self, Self::Chrome | Self::All)
    }
}

impl FromStr for ScanType {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "chrome" => Ok(Self::Chrome),
            "all" => Ok(Self::All),
            other => Err(SourceError::InvalidTarget(format!(
                "unknown scan type {other:?} (expected github, chrome, or all)"
            ))),
        }
    }
}

/// 64-bit FNV-1a. Fixed across builds and platforms, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Offline heuristic scan of a single target URL.
///
/// Deterministic: the same target and scan type always yield the same batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSource {
    target_url: String,
    scan_type: ScanType,
}

impl TargetSource {
    pub fn new(target_url: impl Into<String>, scan_type: ScanType) -> Self {
        Self {
            target_url: target_url.into(),
            scan_type,
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    fn url_hash(&self) -> u64 {
        fnv1a(self.target_url.as_bytes())
    }

    fn last_segment(&self) -> &str {
        self.target_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.target_url)
    }

    fn github_zombies(&self, out: &mut Vec<OpportunityRecord>) {
        if self.target_url.contains("github") {
            out.push(OpportunityRecord {
                id: format!("github-{}", out.len() + 1),
                title: format!("{}-legacy", self.last_segment()),
                description: "Abandoned branch with high value legacy code.".into(),
                price: "Pending valuation".into(),
                revenue: "Investigate".into(),
                category: Category::GithubZombie,
                details: format!("Legacy tree at {}/tree/legacy.", self.target_url),
            });
        }
        if self.url_hash() % 2 == 0 {
            out.push(OpportunityRecord {
                id: format!("github-{}", out.len() + 1),
                title: "unknown-dependency-v1".into(),
                description: "Deprecated dependency still in use.".into(),
                price: "Pending valuation".into(),
                revenue: "Maintenance Risk".into(),
                category: Category::GithubZombie,
                details: "Pinned to https://github.com/example/dep-v1 with no upstream activity."
                    .into(),
            });
        }
    }

    fn chrome_ghosts(&self, out: &mut Vec<OpportunityRecord>) {
        let reachable =
            self.target_url.starts_with("http://") || self.target_url.starts_with("https://");
        if reachable {
            out.push(OpportunityRecord {
                id: format!("chrome-{}", out.len() + 1),
                title: format!("Verified Site: {}", self.host()),
                description: "Active endpoint detected.".into(),
                price: "Pending valuation".into(),
                revenue: "Active".into(),
                category: Category::ChromeGhost,
                details: format!("Endpoint {} answered the probe.", self.target_url),
            });
            out.push(OpportunityRecord {
                id: format!("chrome-{}", out.len() + 1),
                title: "Hidden API: /v1/internal".into(),
                description: "Undocumented internal API endpoint discovered via JS analysis."
                    .into(),
                price: "Pending valuation".into(),
                revenue: "High Value".into(),
                category: Category::ChromeGhost,
                details: format!(
                    "Route {}/api/v1/internal referenced from bundled scripts.",
                    self.target_url.trim_end_matches('/')
                ),
            });
        } else {
            out.push(OpportunityRecord {
                id: format!("chrome-{}", out.len() + 1),
                title: format!("Inaccessible: {}", self.target_url),
                description: "Could not reach target.".into(),
                price: "Unknown".into(),
                revenue: "Unreachable".into(),
                category: Category::ChromeGhost,
                details: "Target has no http(s) scheme; no probe was attempted.".into(),
            });
        }
    }

    fn host(&self) -> &str {
        let without_scheme = self
            .target_url
            .split_once("://")
            .map_or(self.target_url.as_str(), |(_, rest)| rest);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}

impl ScanSource for TargetSource {
    fn name(&self) -> &str {
        "target"
    }

    fn scan(&self) -> Result<ScanBatch, SourceError> {
        if self.target_url.trim().is_empty() {
            return Err(SourceError::InvalidTarget("empty target url".into()));
        }
        let mut records = Vec::new();
        if self.scan_type.includes_github() {
            self.github_zombies(&mut records);
        }
        if self.scan_type.includes_chrome() {
            self.chrome_ghosts(&mut records);
        }
        Ok(ScanBatch::new(records)?)
    }
}

/// Records loaded from a JSON array on disk, typed at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScanSource for JsonFileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn scan(&self) -> Result<ScanBatch, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let raw: Vec<RawRecord> =
            serde_json::from_str(&text).map_err(|e| SourceError::Json {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        Ok(ScanBatch::from_raw(raw)?)
    }
}
