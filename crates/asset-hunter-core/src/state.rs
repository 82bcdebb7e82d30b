#![forbid(unsafe_code)]

//! Dashboard view state: the single owner of every mutable cell.
//!
//! # Cells
//!
//! | Cell | Meaning |
//! |------|---------|
//! | `busy` | a scan is in flight; the trigger is disabled |
//! | `assets` | records of the last applied scan |
//! | `drawer_open` | the detail drawer is visible |
//! | `selected` | single-slot valuation projection |
//!
//! # Scan discipline
//!
//! `trigger_scan` supersedes any in-flight scan: the previous ticket is
//! cancelled and forgotten. A completion is applied only when its id equals
//! the in-flight ticket's id, so overlapping scans always end in exactly one
//! terminal `busy == false`, set by the newest scan.
//!
//! Closing the drawer keeps `selected`; `reopen_drawer` shows it again.

use crate::analyzer::{Analyzer, ProjectionAnalyzer};
use crate::record::{OpportunityRecord, SelectedValuation};
use crate::scan::{ScanId, ScanOutcome, ScanTicket};

/// Placeholder shown when there is nothing to list and no scan running.
pub const EMPTY_STATE_MESSAGE: &str = "System Ready. Initiate scan to reveal hidden assets.";

/// What the drawer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerView<'a> {
    Hidden,
    /// Open with nothing selected: indefinite loading indicator.
    OpenEmpty,
    OpenPopulated(&'a SelectedValuation),
}

/// Result of feeding a completion back into the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanApply {
    /// The batch replaced the collection.
    Applied { records: usize },
    /// The in-flight scan was cancelled from the task side.
    Cancelled,
    /// The source failed; the collection is unchanged.
    Failed(String),
    /// The completion belongs to a superseded or cancelled scan and was ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct DashboardState<A: Analyzer = ProjectionAnalyzer> {
    busy: bool,
    assets: Vec<OpportunityRecord>,
    drawer_open: bool,
    selected: Option<SelectedValuation>,
    in_flight: Option<ScanTicket>,
    next_scan_id: u64,
    last_applied: Option<ScanId>,
    last_error: Option<String>,
    analyzer: A,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::with_analyzer(ProjectionAnalyzer)
    }
}

impl<A: Analyzer> DashboardState<A> {
    pub fn with_analyzer(analyzer: A) -> Self {
        Self {
            busy: false,
            assets: Vec::new(),
            drawer_open: false,
            selected: None,
            in_flight: None,
            next_scan_id: 1,
            last_applied: None,
            last_error: None,
            analyzer,
        }
    }

    // =========================================================================
    // Scan
    // =========================================================================

    /// Start a scan. `busy` is true when this returns.
    ///
    /// Any in-flight scan is cancelled and its completion will be ignored.
    pub fn trigger_scan(&mut self) -> ScanTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
            tracing::debug!(
                target: "asset_hunter.scan",
                scan_id = previous.id().get(),
                "superseding in-flight scan"
            );
        }
        let ticket = ScanTicket::new(ScanId::new(self.next_scan_id));
        self.next_scan_id += 1;
        self.busy = true;
        self.last_error = None;
        self.in_flight = Some(ticket.clone());
        tracing::info!(
            target: "asset_hunter.scan",
            scan_id = ticket.id().get(),
            "scan started"
        );
        ticket
    }

    /// Feed a finished scan back. Only the in-flight id is applied.
    pub fn complete_scan(&mut self, id: ScanId, outcome: ScanOutcome) -> ScanApply {
        let matches = self.in_flight.as_ref().is_some_and(|t| t.id() == id);
        if !matches {
            tracing::debug!(
                target: "asset_hunter.scan",
                scan_id = id.get(),
                outcome = outcome.label(),
                stale = true,
                "ignoring stale scan completion"
            );
            return ScanApply::Stale;
        }

        self.in_flight = None;
        self.busy = false;
        match outcome {
            ScanOutcome::Completed(batch) => {
                let records = batch.len();
                self.assets = batch.into_records();
                self.last_applied = Some(id);
                tracing::info!(
                    target: "asset_hunter.scan",
                    scan_id = id.get(),
                    records,
                    "scan applied"
                );
                ScanApply::Applied { records }
            }
            ScanOutcome::Cancelled => {
                tracing::info!(target: "asset_hunter.scan", scan_id = id.get(), "scan cancelled");
                ScanApply::Cancelled
            }
            ScanOutcome::Failed(message) => {
                tracing::warn!(
                    target: "asset_hunter.scan",
                    scan_id = id.get(),
                    error = %message,
                    "scan failed"
                );
                self.last_error = Some(message.clone());
                ScanApply::Failed(message)
            }
        }
    }

    /// Cancel the in-flight scan, keeping the current collection.
    ///
    /// Returns `false` when nothing was in flight.
    pub fn cancel_scan(&mut self) -> bool {
        let Some(ticket) = self.in_flight.take() else {
            return false;
        };
        ticket.cancel();
        self.busy = false;
        tracing::info!(
            target: "asset_hunter.scan",
            scan_id = ticket.id().get(),
            "scan cancelled by user"
        );
        true
    }

    // =========================================================================
    // Selection / drawer
    // =========================================================================

    /// Project `record` into the selected slot and open the drawer.
    pub fn select_for_analysis(&mut self, record: &OpportunityRecord) {
        self.selected = Some(self.analyzer.analyze(record));
        self.drawer_open = true;
        tracing::debug!(
            target: "asset_hunter.drawer",
            record_id = %record.id,
            "drawer opened for record"
        );
    }

    /// Analyze the card at `index`. Returns `false` when out of range.
    pub fn analyze_index(&mut self, index: usize) -> bool {
        let Some(record) = self.assets.get(index).cloned() else {
            return false;
        };
        self.select_for_analysis(&record);
        true
    }

    /// Analyze the record with identifier `id` in the current collection.
    pub fn analyze_id(&mut self, id: &str) -> bool {
        match self.assets.iter().position(|r| r.id == id) {
            Some(index) => self.analyze_index(index),
            None => false,
        }
    }

    /// Hide the drawer. The selected slot is retained.
    pub fn close_drawer(&mut self) {
        if self.drawer_open {
            tracing::debug!(target: "asset_hunter.drawer", "drawer closed");
        }
        self.drawer_open = false;
    }

    /// Show the drawer again with whatever the slot holds.
    pub fn reopen_drawer(&mut self) {
        self.drawer_open = true;
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn assets(&self) -> &[OpportunityRecord] {
        &self.assets
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn selected(&self) -> Option<&SelectedValuation> {
        self.selected.as_ref()
    }

    pub fn in_flight(&self) -> Option<ScanId> {
        self.in_flight.as_ref().map(ScanTicket::id)
    }

    pub fn last_applied(&self) -> Option<ScanId> {
        self.last_applied
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when the empty-state placeholder replaces the card grid.
    pub fn show_empty_state(&self) -> bool {
        self.assets.is_empty() && !self.busy
    }

    pub fn drawer_view(&self) -> DrawerView<'_> {
        match (self.drawer_open, self.selected.as_ref()) {
            (false, _) => DrawerView::Hidden,
            (true, None) => DrawerView::OpenEmpty,
            (true, Some(v)) => DrawerView::OpenPopulated(v),
        }
    }
}
