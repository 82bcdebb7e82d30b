#![forbid(unsafe_code)]

//! Identity-tagged scan tickets and the background scan body.
//!
//! Each call to [`DashboardState::trigger_scan`](crate::state::DashboardState::trigger_scan)
//! allocates a fresh [`ScanId`] and a [`CancelToken`]. The background task
//! runs [`run_scan`] and reports back with the same id; only the completion
//! whose id matches the in-flight ticket is applied.

use std::fmt;
use std::time::Duration;

use crate::batch::ScanBatch;
use crate::cancel::CancelToken;
use crate::source::ScanSource;

/// Default simulated scan latency.
pub const DEFAULT_SCAN_LATENCY: Duration = Duration::from_millis(2_000);

/// Identity of one scan request. Strictly increasing per dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScanId(u64);

impl ScanId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for one in-flight scan.
#[derive(Debug, Clone)]
pub struct ScanTicket {
    id: ScanId,
    token: CancelToken,
}

impl ScanTicket {
    pub(crate) fn new(id: ScanId) -> Self {
        Self {
            id,
            token: CancelToken::new(),
        }
    }

    pub fn id(&self) -> ScanId {
        self.id
    }

    /// Token the background task waits on.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// How a scan task finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(ScanBatch),
    Cancelled,
    Failed(String),
}

impl ScanOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }
}

/// Body of the background scan task.
///
/// Waits out `latency` (returning early if the token is cancelled), then asks
/// the source for a batch. Meant to run off the UI thread.
pub fn run_scan(source: &dyn ScanSource, token: &CancelToken, latency: Duration) -> ScanOutcome {
    if token.wait_timeout(latency) {
        return ScanOutcome::Cancelled;
    }
    let result = source.scan();
    if token.is_cancelled() {
        return ScanOutcome::Cancelled;
    }
    match result {
        Ok(batch) => ScanOutcome::Completed(batch),
        Err(e) => {
            tracing::warn!(
                target: "asset_hunter.scan",
                source = source.name(),
                error = %e,
                "scan source failed"
            );
            ScanOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::mock_batch;
    use crate::source::{MockSource, ScanType, TargetSource};
    use std::thread;
    use std::time::Instant;

    #[test]
    fn scan_id_display() {
        assert_eq!(ScanId::new(7).to_string(), "#7");
    }

    #[test]
    fn run_scan_completes_with_zero_latency() {
        let token = CancelToken::new();
        let outcome = run_scan(&MockSource, &token, Duration::ZERO);
        assert_eq!(outcome, ScanOutcome::Completed(mock_batch()));
    }

    #[test]
    fn run_scan_waits_out_latency_before_completing() {
        let token = CancelToken::new();
        let start = Instant::now();
        let outcome = run_scan(&MockSource, &token, Duration::from_millis(50));
        assert_eq!(outcome, ScanOutcome::Completed(mock_batch()));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn run_scan_returns_cancelled_for_cancelled_token() {
        let token = CancelToken::new();
        token.cancel();
        let outcome = run_scan(&MockSource, &token, Duration::from_secs(60));
        assert_eq!(outcome, ScanOutcome::Cancelled);
    }

    #[test]
    fn cancel_interrupts_latency_wait() {
        let ticket = ScanTicket::new(ScanId::new(1));
        let token = ticket.token().clone();
        let start = Instant::now();
        let handle =
            thread::spawn(move || run_scan(&MockSource, &token, Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(20));
        ticket.cancel();
        assert_eq!(handle.join().unwrap(), ScanOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn source_error_becomes_failed_outcome() {
        let token = CancelToken::new();
        let source = TargetSource::new("", ScanType::All);
        let outcome = run_scan(&source, &token, Duration::ZERO);
        assert!(matches!(outcome, ScanOutcome::Failed(ref msg) if msg.contains("empty target")));
        assert_eq!(outcome.label(), "failed");
    }
}
