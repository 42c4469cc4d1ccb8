//! Post-split integrity checks.
//!
//! Two read-only inspections run over every relation pair of a split:
//!
//! - **Symmetric counts**: a pair's forward and reverse message-passing edge
//!   sets have the same size in every split.
//! - **Proportion**: the undirected edges a split consumes (its supervision
//!   positives plus its message passing) equal `round(p * total + prev)`,
//!   where `prev` is the count consumed by the preceding split. Carrying
//!   `prev` from train to validation to test confirms that the three splits
//!   partition the population without gaps or overlaps.
//!
//! [`check_splits`] collects every outcome into an [`IntegrityReport`]; the
//! caller decides whether a failure is fatal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::HeteroGraph;
use crate::reverse::ReversePairing;
use crate::split::{SplitGraph, SplitKind};
use crate::types::{EdgeSet, RelationTriplet};

/// Absolute slack allowed between expected and observed proportion counts.
pub const PROPORTION_TOLERANCE: usize = 1;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A failed integrity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Forward and reverse message passing differ in size.
    AsymmetricCounts {
        /// The split inspected.
        split: SplitKind,
        /// Forward relation.
        forward: RelationTriplet,
        /// Reverse relation.
        reverse: RelationTriplet,
        /// Forward message-passing edges.
        forward_count: usize,
        /// Reverse message-passing edges.
        reverse_count: usize,
    },
    /// A split consumed a different number of edges than its proportion
    /// allows.
    Proportion {
        /// The split inspected.
        split: SplitKind,
        /// The supervised relation.
        relation: RelationTriplet,
        /// `round(p * total + prev)`.
        expected: usize,
        /// Supervision positives plus undirected message passing.
        actual: usize,
    },
    /// A relation expected in the split is missing.
    MissingRelation {
        /// The split inspected.
        split: SplitKind,
        /// The absent relation.
        relation: RelationTriplet,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsymmetricCounts {
                split,
                forward,
                reverse,
                forward_count,
                reverse_count,
            } => write!(
                f,
                "{split}: {forward} has {forward_count} message-passing edge(s) \
                 but {reverse} has {reverse_count}"
            ),
            Self::Proportion {
                split,
                relation,
                expected,
                actual,
            } => write!(
                f,
                "{split}: {relation} consumed {actual} edge(s), expected {expected}"
            ),
            Self::MissingRelation { split, relation } => {
                write!(f, "{split}: relation {relation} is missing")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Individual checks
// ---------------------------------------------------------------------------

/// Checks that `forward` and `reverse` have equally many message-passing
/// edges in `split`.
///
/// For a self-mirrored relation the `src < dst` and `src > dst` halves are
/// compared instead.
///
/// # Errors
///
/// Returns [`ValidationError::AsymmetricCounts`] on a mismatch and
/// [`ValidationError::MissingRelation`] if either relation is absent.
pub fn check_symmetric_counts(
    split: &SplitGraph,
    forward: &RelationTriplet,
    reverse: &RelationTriplet,
) -> Result<(), ValidationError> {
    let fwd = message_passing(split, forward)?;
    let (forward_count, reverse_count) = if forward == reverse {
        let below = fwd.pairs().filter(|(s, d)| s < d).count();
        let above = fwd.pairs().filter(|(s, d)| s > d).count();
        (below, above)
    } else {
        (fwd.len(), message_passing(split, reverse)?.len())
    };
    if forward_count == reverse_count {
        Ok(())
    } else {
        Err(ValidationError::AsymmetricCounts {
            split: split.kind,
            forward: forward.clone(),
            reverse: reverse.clone(),
            forward_count,
            reverse_count,
        })
    }
}

/// Checks the proportion of `relation`'s undirected population consumed by
/// `split`, given `total` undirected edges and `prev` edges consumed by the
/// preceding split.
///
/// Returns the observed consumed count, which becomes `prev` for the next
/// split.
///
/// # Errors
///
/// Returns [`ValidationError::Proportion`] when the observed count is more
/// than [`PROPORTION_TOLERANCE`] away from the expected one.
pub fn check_proportion(
    split: &SplitGraph,
    relation: &RelationTriplet,
    total: usize,
    prev: usize,
) -> Result<usize, ValidationError> {
    let actual = consumed(split, relation)?;
    let p = split.kind.proportion(&split.config);
    let expected = (p * total as f64 + prev as f64).round().max(0.0) as usize;
    if actual.abs_diff(expected) <= PROPORTION_TOLERANCE {
        Ok(actual)
    } else {
        Err(ValidationError::Proportion {
            split: split.kind,
            relation: relation.clone(),
            expected,
            actual,
        })
    }
}

/// Undirected edges `split` consumes for `relation`.
fn consumed(split: &SplitGraph, relation: &RelationTriplet) -> Result<usize, ValidationError> {
    let mp = undirected_count(relation, message_passing(split, relation)?);
    let positives = split.supervision(relation).map_or(0, |s| s.positives());
    if split.supervision_is_disjoint() {
        Ok(mp + positives)
    } else {
        Ok(mp)
    }
}

fn message_passing<'s>(
    split: &'s SplitGraph,
    relation: &RelationTriplet,
) -> Result<&'s EdgeSet, ValidationError> {
    split
        .message_passing(relation)
        .map_err(|_| ValidationError::MissingRelation {
            split: split.kind,
            relation: relation.clone(),
        })
}

/// Counts a relation's edges as undirected: a self-mirrored relation stores
/// each edge in both directions.
fn undirected_count(relation: &RelationTriplet, edges: &EdgeSet) -> usize {
    if relation.is_self_mirrored() {
        edges.undirected_len()
    } else {
        edges.len()
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Which check produced an [`CheckOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Forward/reverse message-passing sizes.
    SymmetricCounts,
    /// Cumulative split proportion.
    Proportion,
}

/// Result of one check on one relation in one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// The split inspected.
    pub split: SplitKind,
    /// The supervised relation of the pair.
    pub relation: RelationTriplet,
    /// Which check ran.
    pub check: CheckKind,
    /// `Ok` on success; the failure otherwise.
    pub result: Result<(), ValidationError>,
}

/// Every outcome of [`check_splits`], in relation then split order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    /// All outcomes.
    pub outcomes: Vec<CheckOutcome>,
}

impl IntegrityReport {
    /// Returns `true` if every check passed.
    pub fn is_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Number of checks that ran.
    pub fn checks(&self) -> usize {
        self.outcomes.len()
    }

    /// Iterates the failures.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Converts the report into the first failure, if any.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's [`ValidationError`].
    pub fn into_result(self) -> Result<(), ValidationError> {
        self.outcomes
            .into_iter()
            .map(|o| o.result)
            .find(Result::is_err)
            .unwrap_or(Ok(()))
    }
}

/// Runs both checks for every relation pair across `[train, val, test]`.
///
/// The supervised relation of a pair is whichever side carries supervision
/// in the train split. Pairs with no supervision (empty relations) are
/// skipped; the symmetric-count check is skipped when the reverse relation
/// is absent from the split.
pub fn check_splits(
    full: &HeteroGraph,
    splits: [&SplitGraph; 3],
    pairing: &ReversePairing,
) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    let [train, _, _] = splits;

    for (forward, reverse) in pairing.pairs() {
        let supervised = if train.supervision(forward).is_some() {
            forward
        } else if train.supervision(reverse).is_some() {
            reverse
        } else {
            continue;
        };
        let mirror = if supervised == forward { reverse } else { forward };
        let total = full
            .edge_set(supervised)
            .map_or(0, |e| undirected_count(supervised, e));

        let mut prev = 0usize;
        for split in splits {
            if split.graph.contains_relation(mirror) {
                report.outcomes.push(CheckOutcome {
                    split: split.kind,
                    relation: supervised.clone(),
                    check: CheckKind::SymmetricCounts,
                    result: check_symmetric_counts(split, supervised, mirror),
                });
            }
            let result = match check_proportion(split, supervised, total, prev) {
                Ok(actual) => {
                    prev = actual;
                    Ok(())
                }
                Err(e) => {
                    if let ValidationError::Proportion { actual, .. } = &e {
                        prev = *actual;
                    }
                    Err(e)
                }
            };
            report.outcomes.push(CheckOutcome {
                split: split.kind,
                relation: supervised.clone(),
                check: CheckKind::Proportion,
                result,
            });
        }
    }

    tracing::debug!(
        checks = report.checks(),
        failures = report.failures().count(),
        "integrity checks complete"
    );
    report
}
