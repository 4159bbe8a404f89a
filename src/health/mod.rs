//! Health classification of probe outcomes
//!
//! Reduces the success flags of one test run to a tri-state health code.

use crate::types::HealthCode;

/// Classify a run's probe outcomes into a health code.
///
/// Empty input yields `Unknown`. Short-circuits to `Mixed` as soon as both
/// a success and a failure have been observed.
pub fn classify<I>(results: I) -> HealthCode
where
    I: IntoIterator<Item = bool>,
{
    let mut seen_any = false;
    let mut all_passed = true;
    let mut all_failed = true;

    for success in results {
        seen_any = true;
        if success {
            all_failed = false;
        } else {
            all_passed = false;
        }
        if !all_passed && !all_failed {
            return HealthCode::Mixed;
        }
    }

    if !seen_any {
        HealthCode::Unknown
    } else if all_passed {
        HealthCode::AllPassed
    } else {
        HealthCode::AllFailed
    }
}
