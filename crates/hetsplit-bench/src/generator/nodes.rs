//! Node rows for the three generated node types.

use hetsplit_core::{Table, TableError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::GeneratorConfig;

pub(crate) const GENE: &str = "gene_protein";
pub(crate) const DISEASE: &str = "disease";
pub(crate) const DRUG: &str = "drug";

const DISEASE_STEMS: &[&str] = &[
    "carcinoma",
    "syndrome",
    "dystrophy",
    "anemia",
    "neuropathy",
    "myopathy",
    "fibrosis",
    "dysplasia",
];

/// Raw identifiers per node type, plus the shuffled row order.
#[derive(Debug, Clone)]
pub struct GeneratedNodes {
    /// Raw `gene_protein` identifiers.
    pub genes: Vec<String>,
    /// Raw `disease` identifiers.
    pub diseases: Vec<String>,
    /// Raw `drug` identifiers.
    pub drugs: Vec<String>,
    rows: Vec<[String; 3]>,
}

impl GeneratedNodes {
    /// Converts the rows into a node [`Table`].
    ///
    /// # Errors
    ///
    /// Propagates [`Table::new`] failures.
    pub fn into_table(self) -> Result<Table, TableError> {
        let headers = vec![
            "node_index".to_owned(),
            "node_name".to_owned(),
            "node_type".to_owned(),
        ];
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        Table::new(headers, rows)
    }
}

/// Builds node rows for every type, interleaved in random order so that
/// raw identifiers are not already grouped by type.
pub fn build_nodes(config: &GeneratorConfig, rng: &mut StdRng) -> GeneratedNodes {
    // Disjoint numeric ranges keep raw ids unique across types, matching
    // exports where `node_index` is a global row number.
    let genes: Vec<String> = (0..config.num_genes).map(|i| i.to_string()).collect();
    let diseases: Vec<String> = (0..config.num_diseases)
        .map(|i| (config.num_genes + i).to_string())
        .collect();
    let drugs: Vec<String> = (0..config.num_drugs)
        .map(|i| (config.num_genes + config.num_diseases + i).to_string())
        .collect();

    let mut rows: Vec<[String; 3]> =
        Vec::with_capacity(genes.len() + diseases.len() + drugs.len());
    for (i, id) in genes.iter().enumerate() {
        rows.push([id.clone(), format!("GENE{i}"), GENE.to_owned()]);
    }
    for (i, id) in diseases.iter().enumerate() {
        let stem = DISEASE_STEMS[i % DISEASE_STEMS.len()];
        rows.push([id.clone(), format!("{stem} type {i}"), DISEASE.to_owned()]);
    }
    for (i, id) in drugs.iter().enumerate() {
        rows.push([id.clone(), format!("DB{i:05}"), DRUG.to_owned()]);
    }
    rows.shuffle(rng);

    GeneratedNodes {
        genes,
        diseases,
        drugs,
        rows,
    }
}
