//! Synthetic knowledge-graph generator.
//!
//! Produces node and edge [`Table`]s shaped like a biomedical knowledge
//! graph: `gene_protein`, `disease` and `drug` nodes, bipartite relations
//! written in both directions, and a self-mirrored protein interaction
//! relation.

pub mod edges;
pub mod nodes;

use hetsplit_core::{Table, TableError};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of `gene_protein` nodes.
    pub num_genes: usize,
    /// Number of `disease` nodes.
    pub num_diseases: usize,
    /// Number of `drug` nodes.
    pub num_drugs: usize,
    /// Diseases associated with each gene (`gda`).
    pub diseases_per_gene: usize,
    /// Diseases each drug is indicated for (`indication`).
    pub indications_per_drug: usize,
    /// Genes each drug targets (`target`).
    pub targets_per_drug: usize,
    /// Interaction partners drawn per gene (`ppi`).
    pub ppi_per_gene: usize,
    /// Write every bipartite edge in both directions, as the reference
    /// exports do. When `false`, only the forward rows are emitted.
    pub emit_reverse: bool,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~130 nodes, ~1.4k edge rows
    Small,
    /// ~1.3k nodes, ~18k edge rows
    Medium,
    /// ~6.5k nodes, ~100k edge rows
    Large,
    /// ~26k nodes, ~460k edge rows
    XLarge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        let (num_genes, num_diseases, num_drugs, per_gene, per_drug, ppi) = match self {
            SizeTier::Small => (80, 30, 20, 3, 4, 3),
            SizeTier::Medium => (800, 300, 200, 4, 6, 4),
            SizeTier::Large => (4000, 1500, 1000, 5, 8, 5),
            SizeTier::XLarge => (16_000, 6000, 4000, 6, 10, 6),
        };
        GeneratorConfig {
            seed,
            num_genes,
            num_diseases,
            num_drugs,
            diseases_per_gene: per_gene,
            indications_per_drug: per_drug,
            targets_per_drug: per_drug,
            ppi_per_gene: ppi,
            emit_reverse: true,
        }
    }
}

/// A generated node table and edge table.
#[derive(Debug, Clone)]
pub struct GeneratedTables {
    /// `node_index`, `node_name`, `node_type`.
    pub nodes: Table,
    /// `edge_type`, `display_relation`, `x_index`, `x_type`, `y_index`, `y_type`.
    pub edges: Table,
}

/// Generates node and edge tables from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
///
/// # Errors
///
/// Returns [`TableError`] only if a generated row is malformed, which the
/// builders never produce.
pub fn generate_tables(config: &GeneratorConfig) -> Result<GeneratedTables, TableError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let nodes = nodes::build_nodes(config, &mut rng);
    let edge_rows = edges::build_edges(config, &nodes, &mut rng);
    Ok(GeneratedTables {
        nodes: nodes.into_table()?,
        edges: edge_rows.into_table()?,
    })
}
