//! Ranked views over the suspicious-account list.
//!
//! The backend orders `suspicious_accounts` by descending suspicion.
//! Nothing here re-sorts; rankings are prefixes of that order.

use crate::report::{AnalysisReport, SuspiciousAccount};

/// Side-panel length used when the caller does not pick one.
pub const DEFAULT_TOP_K: usize = 10;

/// The first `k` suspicious accounts in backend order.
pub fn top_suspicious(report: &AnalysisReport, k: usize) -> &[SuspiciousAccount] {
    let accounts = report.suspicious_accounts();
    &accounts[..k.min(accounts.len())]
}
