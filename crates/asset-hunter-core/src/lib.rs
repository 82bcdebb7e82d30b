#![forbid(unsafe_code)]

//! Asset Hunter core
//!
//! State and data for the asset-hunter dashboard, free of any terminal
//! concerns.
//!
//! # Key Components
//!
//! - [`DashboardState`] - Owner of the busy flag, collection, drawer, and selection
//! - [`ScanTicket`] - Identity and cancellation handle for one scan
//! - [`ScanSource`] - Where a batch of records comes from
//! - [`OpportunityRecord`] - One discovered asset
//! - [`export_valuation`] - Write the selected valuation to disk
//!
//! The terminal front end lives in the `asset-hunter` crate and drives
//! [`DashboardState`] from its update loop.

pub mod analyzer;
pub mod batch;
pub mod cancel;
pub mod record;
pub mod report;
pub mod scan;
pub mod source;
pub mod state;

pub use analyzer::{Analyzer, ProjectionAnalyzer};
pub use batch::{ScanBatch, mock_batch};
pub use cancel::CancelToken;
pub use record::{Category, OpportunityRecord, RawRecord, RecordError, SelectedValuation};
pub use report::{CONFIDENCE_LABEL, ReportError, ValuationReport, export_valuation, slug};
pub use scan::{DEFAULT_SCAN_LATENCY, ScanId, ScanOutcome, ScanTicket, run_scan};
pub use source::{JsonFileSource, MockSource, ScanSource, ScanType, SourceError, TargetSource};
pub use state::{DashboardState, DrawerView, EMPTY_STATE_MESSAGE, ScanApply};
