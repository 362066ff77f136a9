use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::error::ReconcileError;

/// Policy applied when the .ch file and the other acquisition files (Result.xml, acq.txt)
/// disagree on the value of a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Keep the value read from the .ch file
    PreferPrimary,
    /// Keep the value read from the other files
    PreferSecondary,
    /// Abort the conversion
    #[default]
    FailOnMismatch,
}

/// Resolve one field observed in two sources.
///
/// Equal values are returned as is whatever the strategy. `field` names the field in the
/// ConflictingValues error.
pub fn reconcile<T: PartialEq + Debug>(
    field: &'static str,
    primary: T,
    secondary: T,
    strategy: MergeStrategy,
) -> Result<T, ReconcileError> {
    if primary == secondary {
        return Ok(primary);
    }

    match strategy {
        MergeStrategy::PreferPrimary => Ok(primary),
        MergeStrategy::PreferSecondary => Ok(secondary),
        MergeStrategy::FailOnMismatch => Err(ReconcileError::ConflictingValues {
            field,
            primary: format!("{primary:?}"),
            secondary: format!("{secondary:?}"),
        }),
    }
}

/// Like reconcile, but the .ch file may not have recorded the field at all (v179 files).
/// In that case there is nothing to conflict with and the secondary value is used.
pub fn reconcile_observed<T: PartialEq + Debug>(
    field: &'static str,
    primary: Option<T>,
    secondary: T,
    strategy: MergeStrategy,
) -> Result<T, ReconcileError> {
    match primary {
        Some(p) => reconcile(field, p, secondary, strategy),
        None => Ok(secondary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [MergeStrategy; 3] = [
        MergeStrategy::PreferPrimary,
        MergeStrategy::PreferSecondary,
        MergeStrategy::FailOnMismatch,
    ];

    #[test]
    fn test_equal_values_never_conflict() {
        for strategy in STRATEGIES {
            assert_eq!(reconcile("operator", "SYSTEM", "SYSTEM", strategy), Ok("SYSTEM"));
            assert_eq!(reconcile("injection time", 12, 12, strategy), Ok(12));
        }
    }

    #[test]
    fn test_prefer_strategies() {
        assert_eq!(
            reconcile("method", "A.M", "B.M", MergeStrategy::PreferPrimary),
            Ok("A.M")
        );
        assert_eq!(
            reconcile("method", "A.M", "B.M", MergeStrategy::PreferSecondary),
            Ok("B.M")
        );
    }

    #[test]
    fn test_fail_on_mismatch_reports_both_values() {
        let result = reconcile(
            "sample identifier",
            String::from("140+H"),
            String::from("140-H"),
            MergeStrategy::FailOnMismatch,
        );
        assert_eq!(
            result,
            Err(ReconcileError::ConflictingValues {
                field: "sample identifier",
                primary: String::from("\"140+H\""),
                secondary: String::from("\"140-H\""),
            })
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("sample identifier"));
        assert!(message.contains("140+H") && message.contains("140-H"));
    }

    #[test]
    fn test_unobserved_primary_takes_secondary() {
        for strategy in STRATEGIES {
            assert_eq!(
                reconcile_observed("operator", None, "SYSTEM", strategy),
                Ok("SYSTEM")
            );
        }
        assert!(reconcile_observed("operator", Some("X"), "Y", MergeStrategy::FailOnMismatch).is_err());
    }

    #[test]
    fn test_strategy_yaml_names() {
        let strategy: MergeStrategy = serde_yaml::from_str("PreferSecondary").unwrap();
        assert_eq!(strategy, MergeStrategy::PreferSecondary);
        assert_eq!(MergeStrategy::default(), MergeStrategy::FailOnMismatch);
    }
}
