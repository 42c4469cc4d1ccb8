/// Structural types shared by the graph store, the splitter, and persistence.
///
/// [`RelationTriplet`] keys every edge collection; [`EdgeSet`] is the pair of
/// parallel endpoint arrays stored under it.
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::newtypes::{NodeType, RelationLabel};

// ---------------------------------------------------------------------------
// RelationTriplet
// ---------------------------------------------------------------------------

/// A directed edge category: `(source type, relation label, destination type)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationTriplet {
    /// Node type of every edge's source endpoint.
    pub src: NodeType,
    /// Relation label.
    pub relation: RelationLabel,
    /// Node type of every edge's destination endpoint.
    pub dst: NodeType,
}

impl RelationTriplet {
    /// Builds a triplet from its three components.
    pub fn new(src: NodeType, relation: RelationLabel, dst: NodeType) -> Self {
        Self { src, relation, dst }
    }

    /// Returns the structural reverse `(dst, relation, src)`.
    pub fn reversed(&self) -> Self {
        Self {
            src: self.dst.clone(),
            relation: self.relation.clone(),
            dst: self.src.clone(),
        }
    }

    /// Returns `true` when the triplet is its own reverse, i.e. both
    /// endpoints share a node type.
    pub fn is_self_mirrored(&self) -> bool {
        self.src == self.dst
    }
}

impl fmt::Display for RelationTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.src, self.relation, self.dst)
    }
}

// ---------------------------------------------------------------------------
// EdgeSet
// ---------------------------------------------------------------------------

/// Two equal-length endpoint sequences for one relation.
///
/// Entry `i` is the directed edge `src[i] -> dst[i]`. Multi-edges are kept as
/// distinct entries; nothing is deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSet {
    /// Source endpoint indices, local to the triplet's source type.
    pub src: Vec<usize>,
    /// Destination endpoint indices, local to the triplet's destination type.
    pub dst: Vec<usize>,
}

impl EdgeSet {
    /// Creates an empty edge set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty edge set with room for `capacity` edges.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            src: Vec::with_capacity(capacity),
            dst: Vec::with_capacity(capacity),
        }
    }

    /// Appends the directed edge `src -> dst`.
    pub fn push(&mut self, src: usize, dst: usize) {
        self.src.push(src);
        self.dst.push(dst);
    }

    /// Number of directed edges.
    ///
    /// Uses the shorter of the two arrays so a malformed deserialized value
    /// never yields an out-of-bounds pair.
    pub fn len(&self) -> usize {
        self.src.len().min(self.dst.len())
    }

    /// Returns `true` when the set holds no edges.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(src, dst)` pairs in storage order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Returns the edge at position `i`.
    pub fn get(&self, i: usize) -> Option<(usize, usize)> {
        Some((*self.src.get(i)?, *self.dst.get(i)?))
    }

    /// Returns a new set with every edge's direction swapped.
    pub fn flipped(&self) -> Self {
        Self {
            src: self.dst.clone(),
            dst: self.src.clone(),
        }
    }

    /// Returns a new set holding the edges at `positions`, in that order.
    ///
    /// Positions outside the set are skipped.
    pub fn select(&self, positions: &[usize]) -> Self {
        let mut out = Self::with_capacity(positions.len());
        for &i in positions {
            if let Some((s, d)) = self.get(i) {
                out.push(s, d);
            }
        }
        out
    }

    /// Undirected size of a same-type relation that stores every edge once
    /// per direction.
    ///
    /// Each `src < dst` entry counts once. Copies of a self-loop `(v, v)`
    /// count in pairs; an unpaired last copy counts on its own.
    pub fn undirected_len(&self) -> usize {
        let mut loops: HashMap<usize, usize> = HashMap::new();
        let mut len = 0;
        for (s, d) in self.pairs() {
            if s < d {
                len += 1;
            } else if s == d {
                *loops.entry(s).or_insert(0) += 1;
            }
        }
        len + loops.values().map(|n| n.div_ceil(2)).sum::<usize>()
    }

    /// Appends every edge of `other`.
    pub fn extend_from(&mut self, other: &EdgeSet) {
        for (s, d) in other.pairs() {
            self.push(s, d);
        }
    }
}

impl FromIterator<(usize, usize)> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (s, d) in iter {
            out.push(s, d);
        }
        out
    }
}
