/// Reverse-relation pairing for undirected multi-relational graphs.
///
/// Every relation triplet `T = (src, rel, dst)` mirrors onto
/// `rev(T) = (dst, rel, src)`. [`resolve_reverse`] walks the triplets in
/// input order and emits each unordered `{T, rev(T)}` pair exactly once, with
/// the first-seen member in the forward position. A same-type triplet is its
/// own reverse and occupies the same position in both lists.
///
/// The reverse of a forward triplet is emitted structurally even when the
/// graph holds no edge set for it; the splitter treats such a relation as
/// having zero edges.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::RelationTriplet;

/// Canonical forward/reverse relation pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversePairing {
    /// Forward relations in canonical order.
    pub forward: Vec<RelationTriplet>,
    /// `reverse[i]` is the mirror of `forward[i]`.
    pub reverse: Vec<RelationTriplet>,
}

impl ReversePairing {
    /// Number of relation pairs.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` when there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterates `(forward, reverse)` pairs in canonical order.
    pub fn pairs(&self) -> impl Iterator<Item = (&RelationTriplet, &RelationTriplet)> {
        self.forward.iter().zip(self.reverse.iter())
    }

    /// Returns the mirror of `triplet` if it takes part in any pair.
    pub fn mirror_of(&self, triplet: &RelationTriplet) -> Option<&RelationTriplet> {
        self.pairs().find_map(|(f, r)| {
            if f == triplet {
                Some(r)
            } else if r == triplet {
                Some(f)
            } else {
                None
            }
        })
    }
}

/// Computes the canonical forward/reverse pairing of `triplets`.
///
/// Guarantees, for any input:
/// - every input triplet appears in `forward` or `reverse` (or both, when
///   self-mirrored);
/// - no triplet appears twice in `forward`;
/// - re-running on the same input yields the same pairing.
pub fn resolve_reverse<'a, I>(triplets: I) -> ReversePairing
where
    I: IntoIterator<Item = &'a RelationTriplet>,
{
    let mut pairing = ReversePairing::default();
    let mut emitted: HashSet<RelationTriplet> = HashSet::new();

    for triplet in triplets {
        if emitted.contains(triplet) {
            continue;
        }
        let rev = triplet.reversed();
        if rev == *triplet {
            pairing.forward.push(triplet.clone());
            pairing.reverse.push(rev);
            emitted.insert(triplet.clone());
        } else {
            pairing.forward.push(triplet.clone());
            pairing.reverse.push(rev.clone());
            emitted.insert(triplet.clone());
            emitted.insert(rev);
        }
    }

    pairing
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::newtypes::{NodeType, RelationLabel};

    fn t(src: &str, rel: &str, dst: &str) -> RelationTriplet {
        RelationTriplet::new(
            NodeType::try_from(src).expect("valid"),
            RelationLabel::try_from(rel).expect("valid"),
            NodeType::try_from(dst).expect("valid"),
        )
    }

    #[test]
    fn mirrored_pair_is_emitted_once() {
        let input = [t("disease", "gda", "gene"), t("gene", "gda", "disease")];
        let p = resolve_reverse(&input);
        assert_eq!(p.forward, vec![t("disease", "gda", "gene")]);
        assert_eq!(p.reverse, vec![t("gene", "gda", "disease")]);
    }

    #[test]
    fn self_mirrored_relation_maps_to_itself() {
        let ppi = t("gene", "ppi", "gene");
        let p = resolve_reverse([&ppi, &ppi]);
        assert_eq!(p.forward, vec![ppi.clone()]);
        assert_eq!(p.reverse, vec![ppi]);
    }

    #[test]
    fn reverse_absent_from_input_is_emitted_structurally() {
        let input = [t("drug", "treats", "disease")];
        let p = resolve_reverse(&input);
        assert_eq!(p.reverse, vec![t("disease", "treats", "drug")]);
    }

    #[test]
    fn every_input_is_covered_and_forward_has_no_duplicates() {
        let input = [
            t("a", "r", "b"),
            t("b", "r", "a"),
            t("a", "s", "a"),
            t("b", "q", "c"),
            t("c", "q", "b"),
            t("a", "r2", "b"),
        ];
        let p = resolve_reverse(&input);

        for triplet in &input {
            assert!(
                p.forward.contains(triplet) || p.reverse.contains(triplet),
                "{triplet} not covered"
            );
        }
        let unique: HashSet<_> = p.forward.iter().collect();
        assert_eq!(unique.len(), p.forward.len());
        for (f, r) in p.pairs() {
            assert_eq!(&f.reversed(), r);
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let input = [t("b", "r", "a"), t("a", "r", "b"), t("a", "s", "a")];
        let first = resolve_reverse(&input);
        let second = resolve_reverse(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn mirror_of_works_in_both_directions() {
        let input = [t("a", "r", "b")];
        let p = resolve_reverse(&input);
        assert_eq!(p.mirror_of(&t("b", "r", "a")), Some(&t("a", "r", "b")));
        assert_eq!(p.mirror_of(&t("a", "r", "b")), Some(&t("b", "r", "a")));
        assert_eq!(p.mirror_of(&t("x", "r", "y")), None);
    }
}
