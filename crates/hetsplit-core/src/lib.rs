#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod assemble;
pub mod cbor;
#[cfg(feature = "compression")]
pub mod compression;
pub mod encoding;
pub mod graph;
pub mod integrity;
pub mod mapping;
pub mod newtypes;
pub mod persist;
pub mod reverse;
pub mod split;
pub mod table;
pub mod types;

pub use assemble::{EdgeColumns, assemble_edges};
pub use cbor::{CborError, decode_cbor, encode_cbor};
#[cfg(feature = "compression")]
pub use compression::{CompressionError, compress_zstd, decompress_zstd};
pub use encoding::{ARTIFACT_TAG, Encoding, HeaderError, sniff_artifact};
pub use graph::{GraphError, HeteroGraph, Relation, build_graph};
pub use integrity::{
    CheckKind, CheckOutcome, IntegrityReport, PROPORTION_TOLERANCE, ValidationError,
    check_proportion, check_splits, check_symmetric_counts,
};
pub use mapping::{IdentifierMapping, NodeMappings, build_mappings};
pub use newtypes::{NewtypeError, NodeType, RelationLabel};
pub use persist::{
    Artifact, DEFAULT_MAX_ARTIFACT_SIZE, FULL_DATASET_STEM, PersistError, artifact_file_name,
    decode_artifact, encode_artifact, fingerprint, load, save, split_stems,
};
pub use reverse::{ReversePairing, resolve_reverse};
pub use split::{
    PairMode, RelationSplitSummary, SplitConfig, SplitError, SplitGraph, SplitKind, SplitOutput,
    Supervision, split, split_with_rng,
};
pub use table::{Table, TableColumns, TableError};
pub use types::{EdgeSet, RelationTriplet};

/// Returns the current version of the hetsplit-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
