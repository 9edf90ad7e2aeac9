//! Content policy
//!
//! The single branching decision of the pipeline: whether the signals returned
//! by the vision service warrant rejecting an upload.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::models::AdultSignals;

/// Returns true when any of the adult, gory or racy signals is set.
pub fn is_inappropriate(signals: &AdultSignals) -> bool {
    signals.is_adult_content || signals.is_gory_content || signals.is_racy_content
}

/// What the ingress does with an upload whose analysis call failed.
///
/// `Open` lets the image through to storage (the historical behaviour);
/// `Closed` rejects it without locking out the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisFailurePolicy {
    #[default]
    Open,
    Closed,
}

impl AnalysisFailurePolicy {
    /// Whether an upload with no usable analysis result should be rejected.
    pub fn rejects_unanalyzed(&self) -> bool {
        matches!(self, AnalysisFailurePolicy::Closed)
    }
}

impl FromStr for AnalysisFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "fail-open" => Ok(AnalysisFailurePolicy::Open),
            "closed" | "fail-closed" => Ok(AnalysisFailurePolicy::Closed),
            _ => Err(anyhow::anyhow!("Invalid analysis failure policy: {}", s)),
        }
    }
}

impl Display for AnalysisFailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AnalysisFailurePolicy::Open => write!(f, "open"),
            AnalysisFailurePolicy::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(adult: bool, gory: bool, racy: bool) -> AdultSignals {
        AdultSignals {
            is_adult_content: adult,
            is_gory_content: gory,
            is_racy_content: racy,
            ..Default::default()
        }
    }

    #[test]
    fn test_policy_truth_table() {
        for adult in [false, true] {
            for gory in [false, true] {
                for racy in [false, true] {
                    assert_eq!(
                        is_inappropriate(&signals(adult, gory, racy)),
                        adult || gory || racy,
                        "adult={adult} gory={gory} racy={racy}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_policy_single_signals() {
        assert!(!is_inappropriate(&signals(false, false, false)));
        assert!(is_inappropriate(&signals(true, false, false)));
        assert!(is_inappropriate(&signals(false, true, false)));
        assert!(is_inappropriate(&signals(false, false, true)));
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!(
            "open".parse::<AnalysisFailurePolicy>().unwrap(),
            AnalysisFailurePolicy::Open
        );
        assert_eq!(
            "CLOSED".parse::<AnalysisFailurePolicy>().unwrap(),
            AnalysisFailurePolicy::Closed
        );
        assert!("maybe".parse::<AnalysisFailurePolicy>().is_err());
        assert_eq!(AnalysisFailurePolicy::default(), AnalysisFailurePolicy::Open);
        assert!(!AnalysisFailurePolicy::Open.rejects_unanalyzed());
        assert!(AnalysisFailurePolicy::Closed.rejects_unanalyzed());
    }
}
