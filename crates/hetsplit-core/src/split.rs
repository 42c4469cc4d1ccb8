/// Disjoint train/validation/test link splitting with negative sampling.
///
/// # Algorithm
///
/// For each `(forward, reverse)` pair of a [`ReversePairing`], in pairing
/// order:
///
/// 1. **Population.** The undirected edges of the pair. For a self-mirrored
///    relation these are the stored edges with `src <= dst`; for a mirrored
///    pair they are the forward relation's edges, whose flips must be exactly
///    the reverse relation's edges.
/// 2. **Permutation.** One seeded shuffle lays the population out as
///    `[train | validation | test]`, with `round(p_val * N)` validation and
///    `round(p_test * N)` test edges; train takes the remainder.
/// 3. **Disjoint train.** The first `round(ratio * n_train)` train edges
///    become supervision-only; the rest are train message passing. With a
///    ratio of zero, train supervision is the whole train group.
/// 4. **Message passing.** Validation sees all train edges; test sees train
///    plus validation. Both directions of an undirected edge always land in
///    the same split.
/// 5. **Negatives.** Each split draws `round(positives * negative_ratio)`
///    non-edges of the relation, checked against the full graph.
///
/// The generator is consumed in a fixed order per pair: the permutation,
/// then train, validation, and test negatives. The result is a pure function
/// of the graph, the pairing, and the [`SplitConfig`].
use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::graph::{GraphError, HeteroGraph};
use crate::newtypes::NodeType;
use crate::reverse::ReversePairing;
use crate::types::{EdgeSet, RelationTriplet};

mod negative;

use negative::{Shortfall, sample_negatives};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters of a link split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of undirected edges held out for validation.
    pub p_val: f64,
    /// Fraction of undirected edges held out for testing.
    pub p_test: f64,
    /// Fraction of train edges withheld from message passing and used only
    /// as supervision targets.
    pub disjoint_train_ratio: f64,
    /// Negatives drawn per positive supervision edge.
    pub negative_ratio: f64,
    /// Seed of the single random stream used by the split.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            p_val: 0.1,
            p_test: 0.1,
            disjoint_train_ratio: 0.2,
            negative_ratio: 1.0,
            seed: 0,
        }
    }
}

impl SplitConfig {
    /// Fraction of undirected edges left for training.
    pub fn p_train(&self) -> f64 {
        1.0 - self.p_val - self.p_test
    }

    /// Returns `true` when train supervision edges are withheld from train
    /// message passing.
    pub fn is_disjoint(&self) -> bool {
        self.disjoint_train_ratio > 0.0
    }

    /// Checks the parameter constraints.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfig`] unless `0 < p_val`, `0 < p_test`,
    /// `p_val + p_test < 1`, `0 <= disjoint_train_ratio < 1`, and
    /// `negative_ratio >= 0`, all finite.
    pub fn validate(&self) -> Result<(), SplitError> {
        let all_finite = [
            self.p_val,
            self.p_test,
            self.disjoint_train_ratio,
            self.negative_ratio,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(invalid("split parameters must be finite"));
        }
        if self.p_val <= 0.0 || self.p_test <= 0.0 {
            return Err(invalid("p_val and p_test must be greater than 0"));
        }
        if self.p_val + self.p_test >= 1.0 {
            return Err(invalid("p_val + p_test must be less than 1"));
        }
        if !(0.0..1.0).contains(&self.disjoint_train_ratio) {
            return Err(invalid("disjoint_train_ratio must be in [0, 1)"));
        }
        if self.negative_ratio < 0.0 {
            return Err(invalid("negative_ratio must not be negative"));
        }
        Ok(())
    }
}

fn invalid(detail: &str) -> SplitError {
    SplitError::InvalidConfig(detail.to_owned())
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised by [`split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The configuration or the relation pairing is unusable.
    InvalidConfig(String),
    /// A relation has too few edges to leave a non-empty train message
    /// passing group.
    InsufficientEdges {
        /// The relation being split.
        relation: String,
        /// Its undirected edge count.
        edges: usize,
        /// Which group came out empty.
        detail: String,
    },
    /// A relation pair is declared undirected but its two directions do not
    /// mirror each other.
    AsymmetricRelation {
        /// Forward relation.
        forward: String,
        /// Reverse relation.
        reverse: String,
        /// Human-readable description of the mismatch.
        detail: String,
    },
    /// Not enough non-edges exist to draw the requested negatives.
    InsufficientNegatives {
        /// The relation being sampled.
        relation: String,
        /// The split that requested the negatives.
        split: SplitKind,
        /// Negatives requested.
        requested: usize,
        /// Non-edges available.
        available: usize,
    },
    /// Assembling a derived split graph failed.
    Graph(GraphError),
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(detail) => write!(f, "invalid split configuration: {detail}"),
            Self::InsufficientEdges {
                relation,
                edges,
                detail,
            } => write!(
                f,
                "relation {relation} has too few edges ({edges}) to split: {detail}"
            ),
            Self::AsymmetricRelation {
                forward,
                reverse,
                detail,
            } => write!(
                f,
                "relations {forward} and {reverse} are not mirror images: {detail}"
            ),
            Self::InsufficientNegatives {
                relation,
                split,
                requested,
                available,
            } => write!(
                f,
                "relation {relation}: {split} split needs {requested} negative(s) \
                 but only {available} non-edge(s) exist; lower negative_ratio"
            ),
            Self::Graph(e) => write!(f, "split graph assembly failed: {e}"),
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            Self::InvalidConfig(_)
            | Self::InsufficientEdges { .. }
            | Self::AsymmetricRelation { .. }
            | Self::InsufficientNegatives { .. } => None,
        }
    }
}

impl From<GraphError> for SplitError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Which of the three splits a [`SplitGraph`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    /// Training split.
    Train,
    /// Validation split.
    Validation,
    /// Test split.
    Test,
}

impl SplitKind {
    /// The three splits in pipeline order.
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Validation, SplitKind::Test];

    /// Lowercase name, also used as the persisted file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }

    /// The configured fraction of undirected edges this split holds out.
    pub fn proportion(self, config: &SplitConfig) -> f64 {
        match self {
            Self::Train => config.p_train(),
            Self::Validation => config.p_val,
            Self::Test => config.p_test,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Train => 0,
            Self::Validation => 1,
            Self::Test => 2,
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supervision targets of one relation in one split.
///
/// `label_index` holds the positive pairs followed by the negative pairs;
/// `label[i]` is `1` for a positive and `0` for a negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supervision {
    /// The supervised relation.
    pub triplet: RelationTriplet,
    /// Positive then negative endpoint pairs.
    pub label_index: EdgeSet,
    /// Ground truth per `label_index` entry.
    pub label: Vec<u8>,
}

impl Supervision {
    /// Number of positive targets.
    pub fn positives(&self) -> usize {
        self.label.iter().filter(|&&l| l == 1).count()
    }

    /// Number of negative targets.
    pub fn negatives(&self) -> usize {
        self.label.iter().filter(|&&l| l == 0).count()
    }

    /// The positive pairs.
    pub fn positive_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.label_index
            .pairs()
            .zip(self.label.iter())
            .filter(|(_, l)| **l == 1)
            .map(|(p, _)| p)
    }

    /// The negative pairs.
    pub fn negative_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.label_index
            .pairs()
            .zip(self.label.iter())
            .filter(|(_, l)| **l == 0)
            .map(|(p, _)| p)
    }
}

/// One split: message-passing structure plus supervision targets.
///
/// Each split owns its arrays; no two splits share storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitGraph {
    /// Which split this is.
    pub kind: SplitKind,
    /// The configuration that produced it.
    pub config: SplitConfig,
    /// Message-passing edges, with the full graph's node counts.
    pub graph: HeteroGraph,
    /// Supervision targets per supervised relation, in pairing order.
    pub supervision: Vec<Supervision>,
}

impl SplitGraph {
    /// Message-passing edges of `triplet`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::RelationNotFound`] if the relation is absent.
    pub fn message_passing(&self, triplet: &RelationTriplet) -> Result<&EdgeSet, GraphError> {
        self.graph.edge_set(triplet)
    }

    /// Supervision targets of `triplet`, if it is supervised in this split.
    pub fn supervision(&self, triplet: &RelationTriplet) -> Option<&Supervision> {
        self.supervision.iter().find(|s| &s.triplet == triplet)
    }

    /// Returns `true` when supervision positives never appear in this
    /// split's message passing.
    pub fn supervision_is_disjoint(&self) -> bool {
        self.kind != SplitKind::Train || self.config.is_disjoint()
    }
}

/// How a relation pair was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairMode {
    /// Same-type relation that is its own reverse.
    SelfMirrored,
    /// Two distinct relations mirroring each other.
    Mirrored,
    /// The reverse is absent or empty; split as a directed relation.
    Directed,
    /// Neither direction has edges.
    Empty,
}

/// Per-pair accounting of a split, in undirected edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSplitSummary {
    /// The relation that carries supervision.
    pub supervised: RelationTriplet,
    /// Its mirror, when one was materialised.
    pub mirror: Option<RelationTriplet>,
    /// How the pair was treated.
    pub mode: PairMode,
    /// Undirected edge population.
    pub total: usize,
    /// Train message-passing edges.
    pub train_message_passing: usize,
    /// Train supervision positives.
    pub train_supervision: usize,
    /// Validation supervision positives.
    pub validation: usize,
    /// Test supervision positives.
    pub test: usize,
    /// Negatives drawn for train, validation, test.
    pub negatives: [usize; 3],
}

/// The three splits plus per-pair accounting.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    /// Training split.
    pub train: SplitGraph,
    /// Validation split.
    pub val: SplitGraph,
    /// Test split.
    pub test: SplitGraph,
    /// One entry per relation pair, in pairing order.
    pub summaries: Vec<RelationSplitSummary>,
}

impl SplitOutput {
    /// The three splits in pipeline order.
    pub fn splits(&self) -> [&SplitGraph; 3] {
        [&self.train, &self.val, &self.test]
    }
}

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Splits `graph` with a generator seeded from `config.seed`.
///
/// # Errors
///
/// See [`split_with_rng`].
pub fn split(
    graph: &HeteroGraph,
    pairing: &ReversePairing,
    config: &SplitConfig,
) -> Result<SplitOutput, SplitError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    split_with_rng(graph, pairing, config, &mut rng)
}

/// Splits `graph` drawing all randomness from `rng`.
///
/// Relations outside the pairing are copied unchanged into every split.
///
/// # Errors
///
/// - [`SplitError::InvalidConfig`]: `config` violates its constraints, the
///   pairing lists differ in length, a pair does not swap endpoint types,
///   or a relation is paired twice.
/// - [`SplitError::AsymmetricRelation`]: both directions have edges but
///   they are not mirror images.
/// - [`SplitError::InsufficientEdges`]: a non-empty relation leaves train
///   message passing empty.
/// - [`SplitError::InsufficientNegatives`]: too few non-edges for the
///   requested negatives.
pub fn split_with_rng(
    graph: &HeteroGraph,
    pairing: &ReversePairing,
    config: &SplitConfig,
    rng: &mut StdRng,
) -> Result<SplitOutput, SplitError> {
    config.validate()?;
    check_pairing(pairing)?;

    let mut message_passing: HashMap<RelationTriplet, [EdgeSet; 3]> = HashMap::new();
    let mut supervision: [Vec<Supervision>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    let mut summaries = Vec::with_capacity(pairing.len());

    for (forward, reverse) in pairing.pairs() {
        let pair = split_pair(graph, forward, reverse, config, rng)?;
        tracing::debug!(
            relation = %pair.summary.supervised,
            mode = ?pair.summary.mode,
            total = pair.summary.total,
            train_mp = pair.summary.train_message_passing,
            train_sup = pair.summary.train_supervision,
            val = pair.summary.validation,
            test = pair.summary.test,
            "split relation pair"
        );
        for (triplet, sets) in pair.message_passing {
            message_passing.insert(triplet, sets);
        }
        if let Some(sets) = pair.supervision {
            for (slot, sup) in supervision.iter_mut().zip(sets) {
                slot.push(sup);
            }
        }
        summaries.push(pair.summary);
    }

    let [train_sup, val_sup, test_sup] = supervision;
    let build = |kind: SplitKind, sup: Vec<Supervision>| -> Result<SplitGraph, SplitError> {
        let edge_sets = graph
            .relations()
            .iter()
            .map(|r| {
                let edges = message_passing
                    .get(&r.triplet)
                    .and_then(|sets| sets.get(kind.position()))
                    .cloned()
                    .unwrap_or_else(|| r.edges.clone());
                (r.triplet.clone(), edges)
            })
            .collect();
        let split_graph = HeteroGraph::assemble(graph.node_counts().clone(), edge_sets)?;
        tracing::info!(
            split = %kind,
            message_passing_edges = split_graph.total_edges(),
            supervised_relations = sup.len(),
            "assembled split"
        );
        Ok(SplitGraph {
            kind,
            config: *config,
            graph: split_graph,
            supervision: sup,
        })
    };

    Ok(SplitOutput {
        train: build(SplitKind::Train, train_sup)?,
        val: build(SplitKind::Validation, val_sup)?,
        test: build(SplitKind::Test, test_sup)?,
        summaries,
    })
}

fn check_pairing(pairing: &ReversePairing) -> Result<(), SplitError> {
    if pairing.forward.len() != pairing.reverse.len() {
        return Err(SplitError::InvalidConfig(format!(
            "{} forward relation(s) but {} reverse relation(s)",
            pairing.forward.len(),
            pairing.reverse.len()
        )));
    }
    let mut seen: HashSet<&RelationTriplet> = HashSet::new();
    for (forward, reverse) in pairing.pairs() {
        if forward.src != reverse.dst || forward.dst != reverse.src {
            return Err(SplitError::InvalidConfig(format!(
                "{reverse} does not swap the endpoint types of {forward}"
            )));
        }
        if !seen.insert(forward) || (forward != reverse && !seen.insert(reverse)) {
            return Err(SplitError::InvalidConfig(format!(
                "relation pair {forward} / {reverse} overlaps an earlier pair"
            )));
        }
    }
    Ok(())
}

/// Result of splitting one relation pair.
struct PairSplit {
    message_passing: Vec<(RelationTriplet, [EdgeSet; 3])>,
    supervision: Option<[Supervision; 3]>,
    summary: RelationSplitSummary,
}

/// Undirected population of one pair, resolved against the graph.
struct Population<'g> {
    supervised: &'g RelationTriplet,
    edges: &'g EdgeSet,
    positions: Vec<usize>,
    mirror: Option<&'g RelationTriplet>,
    mode: PairMode,
    /// Self-loop position -> position of its paired copy.
    loop_partner: HashMap<usize, usize>,
}

fn split_pair(
    graph: &HeteroGraph,
    forward: &RelationTriplet,
    reverse: &RelationTriplet,
    config: &SplitConfig,
    rng: &mut StdRng,
) -> Result<PairSplit, SplitError> {
    let Some(pop) = population(graph, forward, reverse)? else {
        return Ok(PairSplit {
            message_passing: Vec::new(),
            supervision: None,
            summary: RelationSplitSummary {
                supervised: forward.clone(),
                mirror: None,
                mode: PairMode::Empty,
                total: 0,
                train_message_passing: 0,
                train_supervision: 0,
                validation: 0,
                test: 0,
                negatives: [0; 3],
            },
        });
    };

    let total = pop.positions.len();
    let n_val = round_share(config.p_val, total);
    let n_test = round_share(config.p_test, total);
    let n_train = total - n_val - n_test;
    if n_train == 0 {
        return Err(SplitError::InsufficientEdges {
            relation: pop.supervised.to_string(),
            edges: total,
            detail: "no edges left for training".to_owned(),
        });
    }
    let n_disjoint = if config.is_disjoint() {
        round_share(config.disjoint_train_ratio, n_train).max(1)
    } else {
        0
    };
    if n_disjoint >= n_train {
        return Err(SplitError::InsufficientEdges {
            relation: pop.supervised.to_string(),
            edges: total,
            detail: "no train edges left for message passing".to_owned(),
        });
    }

    let mut perm = pop.positions.clone();
    perm.shuffle(rng);

    let (train, rest) = perm.split_at(n_train);
    let (val, test) = rest.split_at(n_val);
    let (train_sup, train_mp) = if n_disjoint > 0 {
        train.split_at(n_disjoint)
    } else {
        (train, train)
    };
    let train_val: Vec<usize> = train.iter().chain(val).copied().collect();

    let mp_positions: [&[usize]; 3] = [train_mp, train, &train_val];
    let sup_positions: [&[usize]; 3] = [train_sup, val, test];

    let mut message_passing = Vec::with_capacity(2);
    match pop.mode {
        PairMode::SelfMirrored => {
            let sets = mp_positions.map(|p| both_directions(pop.edges, p, &pop.loop_partner));
            message_passing.push((pop.supervised.clone(), sets));
        }
        PairMode::Mirrored => {
            let sets = mp_positions.map(|p| pop.edges.select(p));
            if let Some(mirror) = pop.mirror {
                message_passing.push((mirror.clone(), sets.clone().map(|s| s.flipped())));
            }
            message_passing.push((pop.supervised.clone(), sets));
        }
        PairMode::Directed | PairMode::Empty => {
            message_passing.push((pop.supervised.clone(), mp_positions.map(|p| pop.edges.select(p))));
        }
    }

    let positives = positive_pairs(pop.edges);
    let n_src = node_count(graph, &pop.supervised.src);
    let n_dst = node_count(graph, &pop.supervised.dst);

    let mut negatives = [0usize; 3];
    let mut built: Vec<Supervision> = Vec::with_capacity(3);
    for kind in SplitKind::ALL {
        let pos = pop.edges.select(sup_positions[kind.position()]);
        let wanted = round_share(config.negative_ratio, pos.len());
        let neg = sample_negatives(rng, n_src, n_dst, &positives, wanted).map_err(
            |Shortfall {
                 requested,
                 available,
             }| SplitError::InsufficientNegatives {
                relation: pop.supervised.to_string(),
                split: kind,
                requested,
                available,
            },
        )?;
        negatives[kind.position()] = neg.len();
        built.push(labelled(pop.supervised, &pos, &neg));
    }

    let summary = RelationSplitSummary {
        supervised: pop.supervised.clone(),
        mirror: pop.mirror.cloned(),
        mode: pop.mode,
        total,
        train_message_passing: train_mp.len(),
        train_supervision: train_sup.len(),
        validation: val.len(),
        test: test.len(),
        negatives,
    };

    Ok(PairSplit {
        message_passing,
        supervision: <[Supervision; 3]>::try_from(built).ok(),
        summary,
    })
}

/// Resolves the undirected population of a pair, or `None` if neither
/// direction has edges.
fn population<'g>(
    graph: &'g HeteroGraph,
    forward: &'g RelationTriplet,
    reverse: &'g RelationTriplet,
) -> Result<Option<Population<'g>>, SplitError> {
    let fwd = graph.edge_set(forward).ok().filter(|e| !e.is_empty());

    if forward == reverse {
        let Some(edges) = fwd else {
            return Ok(None);
        };
        check_self_symmetric(forward, edges)?;
        let mut positions = Vec::new();
        let mut loop_partner = HashMap::new();
        let mut open_loops: HashMap<usize, usize> = HashMap::new();
        for (i, (s, d)) in edges.pairs().enumerate() {
            if s < d {
                positions.push(i);
            } else if s == d {
                // Stored copies of a self-loop pair up into one undirected edge.
                if let Some(first) = open_loops.remove(&s) {
                    loop_partner.insert(first, i);
                } else {
                    open_loops.insert(s, i);
                    positions.push(i);
                }
            }
        }
        return Ok(Some(Population {
            supervised: forward,
            edges,
            positions,
            mirror: None,
            mode: PairMode::SelfMirrored,
            loop_partner,
        }));
    }

    let rev = graph.edge_set(reverse).ok().filter(|e| !e.is_empty());
    match (fwd, rev) {
        (Some(fwd_edges), Some(rev_edges)) => {
            check_mirrored(forward, fwd_edges, reverse, rev_edges)?;
            Ok(Some(Population {
                supervised: forward,
                edges: fwd_edges,
                positions: (0..fwd_edges.len()).collect(),
                mirror: Some(reverse),
                mode: PairMode::Mirrored,
                loop_partner: HashMap::new(),
            }))
        }
        (Some(edges), None) => Ok(Some(directed(forward, reverse, edges))),
        (None, Some(edges)) => Ok(Some(directed(reverse, forward, edges))),
        (None, None) => Ok(None),
    }
}

fn directed<'g>(
    supervised: &'g RelationTriplet,
    missing: &RelationTriplet,
    edges: &'g EdgeSet,
) -> Population<'g> {
    tracing::warn!(
        relation = %supervised,
        reverse = %missing,
        "reverse relation has no edges; splitting as directed"
    );
    Population {
        supervised,
        edges,
        positions: (0..edges.len()).collect(),
        mirror: None,
        mode: PairMode::Directed,
        loop_partner: HashMap::new(),
    }
}

/// Checks that the `src < dst` half of a same-type relation mirrors its
/// `src > dst` half.
fn check_self_symmetric(triplet: &RelationTriplet, edges: &EdgeSet) -> Result<(), SplitError> {
    let mut balance: HashMap<(usize, usize), i64> = HashMap::new();
    for (s, d) in edges.pairs() {
        if s < d {
            *balance.entry((s, d)).or_insert(0) += 1;
        } else if s > d {
            *balance.entry((d, s)).or_insert(0) -= 1;
        }
    }
    match balance.into_iter().find(|(_, n)| *n != 0) {
        None => Ok(()),
        Some(((s, d), _)) => Err(SplitError::AsymmetricRelation {
            forward: triplet.to_string(),
            reverse: triplet.to_string(),
            detail: format!("edge ({s}, {d}) is not stored equally often in both directions"),
        }),
    }
}

/// Checks that the reverse relation holds exactly the flipped forward edges.
fn check_mirrored(
    forward: &RelationTriplet,
    fwd: &EdgeSet,
    reverse: &RelationTriplet,
    rev: &EdgeSet,
) -> Result<(), SplitError> {
    let mut balance: HashMap<(usize, usize), i64> = HashMap::new();
    for pair in fwd.pairs() {
        *balance.entry(pair).or_insert(0) += 1;
    }
    for (s, d) in rev.pairs() {
        *balance.entry((d, s)).or_insert(0) -= 1;
    }
    match balance.into_iter().find(|(_, n)| *n != 0) {
        None => Ok(()),
        Some(((s, d), _)) => Err(SplitError::AsymmetricRelation {
            forward: forward.to_string(),
            reverse: reverse.to_string(),
            detail: format!(
                "forward edge ({s}, {d}) and reverse edge ({d}, {s}) occur a different number of times"
            ),
        }),
    }
}

/// Expands chosen `src <= dst` positions into both stored directions. A
/// self-loop brings its paired copy along when it has one.
fn both_directions(
    edges: &EdgeSet,
    positions: &[usize],
    loop_partner: &HashMap<usize, usize>,
) -> EdgeSet {
    let mut out = EdgeSet::with_capacity(positions.len() * 2);
    for &i in positions {
        let Some((s, d)) = edges.get(i) else {
            continue;
        };
        out.push(s, d);
        if s != d {
            out.push(d, s);
        } else if loop_partner.contains_key(&i) {
            out.push(s, d);
        }
    }
    out
}

fn positive_pairs(edges: &EdgeSet) -> HashSet<(usize, usize)> {
    edges.pairs().collect()
}

fn node_count(graph: &HeteroGraph, node_type: &NodeType) -> usize {
    graph.node_count(node_type).unwrap_or(0)
}

fn labelled(triplet: &RelationTriplet, positives: &EdgeSet, negatives: &[(usize, usize)]) -> Supervision {
    let mut label_index = positives.clone();
    for &(s, d) in negatives {
        label_index.push(s, d);
    }
    let mut label = vec![1u8; positives.len()];
    label.resize(positives.len() + negatives.len(), 0);
    Supervision {
        triplet: triplet.clone(),
        label_index,
        label,
    }
}

/// `round(share * n)`, clamped to `[0, n]` for non-negative shares.
fn round_share(share: f64, n: usize) -> usize {
    let raw = (share * n as f64).round();
    if raw <= 0.0 { 0 } else { raw as usize }
}
