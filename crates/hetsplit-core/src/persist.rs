//! Persistence of graphs and splits.
//!
//! An [`Artifact`] is either the full [`HeteroGraph`] or one [`SplitGraph`].
//! Both serialize into a single self-describing document whose first key,
//! `"artifact"`, names the variant, so one [`load`] returns "graph or split"
//! without the caller naming the type up front. The tag key is distinct from
//! every payload field (a split carries its own `kind`).
//!
//! Artifacts encode as JSON or CBOR, optionally wrapped in a zstd frame.
//! Decoding sniffs the encoding and the artifact header from the leading
//! bytes. The core never
//! opens files: [`save`] and [`load`] work over `Write`/`Read` handles.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::cbor::{CborError, decode_cbor, encode_cbor};
#[cfg(feature = "compression")]
use crate::compression::{CompressionError, compress_zstd, decompress_zstd};
use crate::encoding::{Encoding, HeaderError, sniff_artifact};
use crate::graph::HeteroGraph;
use crate::split::{SplitGraph, SplitKind};

/// File stem of the persisted full graph.
pub const FULL_DATASET_STEM: &str = "full_dataset";

/// Default cap on decoded artifact size (4 GiB).
pub const DEFAULT_MAX_ARTIFACT_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// A persisted pipeline product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "artifact", rename_all = "snake_case")]
pub enum Artifact {
    /// The full graph.
    Graph(HeteroGraph),
    /// One train/validation/test split.
    Split(SplitGraph),
}

impl Artifact {
    /// The file stem this artifact is conventionally saved under.
    pub fn stem(&self) -> &'static str {
        match self {
            Artifact::Graph(_) => FULL_DATASET_STEM,
            Artifact::Split(s) => s.kind.as_str(),
        }
    }

    /// The message-passing graph: the full graph, or a split's structure.
    pub fn graph(&self) -> &HeteroGraph {
        match self {
            Artifact::Graph(g) => g,
            Artifact::Split(s) => &s.graph,
        }
    }

    /// Returns the split, if this artifact is one.
    pub fn as_split(&self) -> Option<&SplitGraph> {
        match self {
            Artifact::Split(s) => Some(s),
            Artifact::Graph(_) => None,
        }
    }

    /// Consumes the artifact, returning the full graph if it is one.
    pub fn into_graph(self) -> Option<HeteroGraph> {
        match self {
            Artifact::Graph(g) => Some(g),
            Artifact::Split(_) => None,
        }
    }

    /// Consumes the artifact, returning the split if it is one.
    pub fn into_split(self) -> Option<SplitGraph> {
        match self {
            Artifact::Split(s) => Some(s),
            Artifact::Graph(_) => None,
        }
    }
}

/// Conventional file name for an artifact with the given stem.
///
/// `artifact_file_name("train", Encoding::Cbor, true)` is `train.cbor.zst`.
pub fn artifact_file_name(stem: &str, encoding: Encoding, compress: bool) -> String {
    if compress {
        format!("{stem}.{}.{}", encoding.extension(), Encoding::Zstd.extension())
    } else {
        format!("{stem}.{}", encoding.extension())
    }
}

/// File stems of the three splits, in pipeline order.
pub fn split_stems() -> [&'static str; 3] {
    SplitKind::ALL.map(SplitKind::as_str)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while saving or loading an [`Artifact`].
#[derive(Debug)]
pub enum PersistError {
    /// The bytes are not an artifact in any known encoding.
    Header(HeaderError),
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
    /// CBOR encoding or decoding failed.
    Cbor(CborError),
    /// [`Encoding::Zstd`] was passed as the target encoding.
    ZstdIsNotAnEncoding,
    /// Compressed input or output was requested but the `compression`
    /// feature is disabled.
    #[cfg(not(feature = "compression"))]
    CompressionNotAvailable,
    /// zstd compression or decompression failed.
    #[cfg(feature = "compression")]
    Compression(CompressionError),
    /// The encoded artifact exceeds the caller's size limit.
    TooLarge {
        /// The limit in bytes.
        limit: u64,
    },
    /// Reading or writing the underlying handle failed.
    Io(std::io::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Header(e) => write!(f, "{e}"),
            PersistError::Json(e) => write!(f, "JSON error: {e}"),
            PersistError::Cbor(e) => write!(f, "{e}"),
            PersistError::ZstdIsNotAnEncoding => write!(
                f,
                "zstd is the compression layer, not a target encoding; \
                 use json or cbor and request compression"
            ),
            #[cfg(not(feature = "compression"))]
            PersistError::CompressionNotAvailable => write!(
                f,
                "compression is not available; build with the `compression` feature"
            ),
            #[cfg(feature = "compression")]
            PersistError::Compression(e) => write!(f, "{e}"),
            PersistError::TooLarge { limit } => write!(f, "artifact exceeds {limit} bytes"),
            PersistError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Header(e) => Some(e),
            PersistError::Json(e) => Some(e),
            PersistError::Cbor(e) => Some(e),
            #[cfg(feature = "compression")]
            PersistError::Compression(e) => Some(e),
            PersistError::Io(e) => Some(e),
            #[cfg(not(feature = "compression"))]
            PersistError::CompressionNotAvailable => None,
            PersistError::ZstdIsNotAnEncoding | PersistError::TooLarge { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serializes `artifact` to `encoding`, optionally wrapping it in zstd.
///
/// # Errors
///
/// - [`PersistError::ZstdIsNotAnEncoding`]: `encoding` is [`Encoding::Zstd`].
/// - [`PersistError::Json`] / [`PersistError::Cbor`]: serialization failed.
/// - [`PersistError::Compression`]: zstd failed (`compression` feature).
pub fn encode_artifact(
    artifact: &Artifact,
    encoding: Encoding,
    compress: bool,
) -> Result<Vec<u8>, PersistError> {
    let bytes = match encoding {
        Encoding::Json => serde_json::to_vec(artifact).map_err(PersistError::Json)?,
        Encoding::Cbor => encode_cbor(artifact).map_err(PersistError::Cbor)?,
        Encoding::Zstd => return Err(PersistError::ZstdIsNotAnEncoding),
    };

    if compress {
        #[cfg(feature = "compression")]
        {
            return compress_zstd(&bytes).map_err(PersistError::Compression);
        }
        #[cfg(not(feature = "compression"))]
        {
            return Err(PersistError::CompressionNotAvailable);
        }
    }

    Ok(bytes)
}

/// Decodes an artifact, sniffing its encoding and header from the leading bytes.
///
/// A zstd frame is decompressed (up to `max_size` bytes) and its payload
/// re-sniffed; nested compression is rejected.
///
/// # Errors
///
/// Returns [`PersistError`] when the header is not an artifact's, decompression
/// fails, or the payload is not a valid artifact. A graph whose relations
/// reference out-of-range nodes is rejected here.
pub fn decode_artifact(bytes: &[u8], max_size: u64) -> Result<Artifact, PersistError> {
    match sniff_artifact(bytes).map_err(PersistError::Header)? {
        Encoding::Json => serde_json::from_slice(bytes).map_err(PersistError::Json),
        Encoding::Cbor => decode_cbor(bytes).map_err(PersistError::Cbor),
        Encoding::Zstd => decode_compressed(bytes, max_size),
    }
}

#[cfg(feature = "compression")]
fn decode_compressed(bytes: &[u8], max_size: u64) -> Result<Artifact, PersistError> {
    let inner = decompress_zstd(bytes, max_size).map_err(PersistError::Compression)?;
    match sniff_artifact(&inner).map_err(PersistError::Header)? {
        Encoding::Json => serde_json::from_slice(&inner).map_err(PersistError::Json),
        Encoding::Cbor => decode_cbor(&inner).map_err(PersistError::Cbor),
        Encoding::Zstd => Err(PersistError::ZstdIsNotAnEncoding),
    }
}

#[cfg(not(feature = "compression"))]
fn decode_compressed(_bytes: &[u8], _max_size: u64) -> Result<Artifact, PersistError> {
    Err(PersistError::CompressionNotAvailable)
}

/// Writes `artifact` to `writer`.
///
/// # Errors
///
/// See [`encode_artifact`]; write failures become [`PersistError::Io`].
pub fn save<W: Write>(
    artifact: &Artifact,
    writer: &mut W,
    encoding: Encoding,
    compress: bool,
) -> Result<(), PersistError> {
    let bytes = encode_artifact(artifact, encoding, compress)?;
    writer.write_all(&bytes).map_err(PersistError::Io)?;
    writer.flush().map_err(PersistError::Io)?;
    tracing::debug!(
        kind = artifact.stem(),
        bytes = bytes.len(),
        ?encoding,
        compress,
        "saved artifact"
    );
    Ok(())
}

/// Reads an artifact from `reader`, refusing more than `max_size` bytes.
///
/// # Errors
///
/// Returns [`PersistError::TooLarge`] when the stream exceeds `max_size`,
/// [`PersistError::Io`] on read failure, and see [`decode_artifact`].
pub fn load<R: Read>(reader: R, max_size: u64) -> Result<Artifact, PersistError> {
    let mut bytes = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(PersistError::Io)?;
    if bytes.len() as u64 > max_size {
        return Err(PersistError::TooLarge { limit: max_size });
    }
    decode_artifact(&bytes, max_size)
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// SHA-256 of the artifact's JSON encoding, as lowercase hex.
///
/// Two artifacts with identical contents always have the same fingerprint,
/// regardless of the encoding they were loaded from.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn fingerprint(artifact: &Artifact) -> Result<String, PersistError> {
    let bytes = serde_json::to_vec(artifact).map_err(PersistError::Json)?;
    Ok(hex_encode(&Sha256::digest(&bytes)))
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_CHARS[(b >> 4) as usize] as char);
        out.push(HEX_CHARS[(b & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeMap;

    use super::*;
    use crate::newtypes::{NodeType, RelationLabel};
    use crate::reverse::resolve_reverse;
    use crate::split::{SplitConfig, split};
    use crate::types::{EdgeSet, RelationTriplet};

    fn nt(s: &str) -> NodeType {
        NodeType::try_from(s).expect("valid NodeType")
    }

    fn graph() -> HeteroGraph {
        let fwd: EdgeSet = (0..30).map(|i| (i % 10, (i * 3) % 11)).collect();
        let triplet = RelationTriplet::new(
            nt("gene"),
            RelationLabel::try_from("gda").expect("valid"),
            nt("disease"),
        );
        let mut counts = BTreeMap::new();
        counts.insert(nt("gene"), 10);
        counts.insert(nt("disease"), 11);
        HeteroGraph::assemble(
            counts,
            vec![(triplet.reversed(), fwd.flipped()), (triplet, fwd)],
        )
        .expect("graph")
    }

    fn train_split() -> SplitGraph {
        let g = graph();
        let pairing = resolve_reverse(g.relation_triplets());
        split(&g, &pairing, &SplitConfig::default())
            .expect("split")
            .train
    }

    #[test]
    fn graph_survives_json_and_cbor() {
        let artifact = Artifact::Graph(graph());
        for encoding in [Encoding::Json, Encoding::Cbor] {
            let bytes = encode_artifact(&artifact, encoding, false).expect("encode");
            assert_eq!(sniff_artifact(&bytes).expect("sniff"), encoding);
            let back = decode_artifact(&bytes, DEFAULT_MAX_ARTIFACT_SIZE).expect("decode");
            assert_eq!(back, artifact);
        }
    }

    #[test]
    fn split_survives_save_and_load() {
        let artifact = Artifact::Split(train_split());
        let mut buf = Vec::new();
        save(&artifact, &mut buf, Encoding::Cbor, false).expect("save");
        let back = load(buf.as_slice(), DEFAULT_MAX_ARTIFACT_SIZE).expect("load");
        assert_eq!(back.stem(), "train");
        assert_eq!(back, artifact);
    }

    #[cfg(feature = "compression")]
    #[test]
    fn compressed_artifact_is_detected_and_unwrapped() {
        let artifact = Artifact::Split(train_split());
        let bytes = encode_artifact(&artifact, Encoding::Json, true).expect("encode");
        assert_eq!(sniff_artifact(&bytes).expect("sniff"), Encoding::Zstd);
        let back = decode_artifact(&bytes, DEFAULT_MAX_ARTIFACT_SIZE).expect("decode");
        assert_eq!(back, artifact);
    }

    #[test]
    fn split_tag_does_not_collide_with_split_kind() {
        let artifact = Artifact::Split(train_split());
        let json = encode_artifact(&artifact, Encoding::Json, false).expect("encode");
        assert!(
            json.starts_with(br#"{"artifact":"split","kind":"train""#),
            "{}",
            String::from_utf8_lossy(&json[..40])
        );
        for (encoding, compress) in [
            (Encoding::Json, false),
            (Encoding::Cbor, false),
            (Encoding::Json, true),
            (Encoding::Cbor, true),
        ] {
            if compress && cfg!(not(feature = "compression")) {
                continue;
            }
            let bytes = encode_artifact(&artifact, encoding, compress).expect("encode");
            let back = decode_artifact(&bytes, DEFAULT_MAX_ARTIFACT_SIZE).expect("decode");
            assert_eq!(back, artifact, "{encoding:?} compress={compress}");
        }
    }

    #[test]
    fn foreign_document_is_rejected_by_header() {
        let err = decode_artifact(br#"{"kind":"train","graph":{}}"#, DEFAULT_MAX_ARTIFACT_SIZE)
            .expect_err("not an artifact");
        assert!(
            matches!(
                err,
                PersistError::Header(HeaderError::MissingTag {
                    encoding: Encoding::Json
                })
            ),
            "{err}"
        );
    }

    #[test]
    fn zstd_is_not_a_target_encoding() {
        let err = encode_artifact(&Artifact::Graph(graph()), Encoding::Zstd, false)
            .expect_err("zstd target");
        assert!(matches!(err, PersistError::ZstdIsNotAnEncoding));
    }

    #[test]
    fn out_of_range_graph_is_rejected_on_load() {
        let json = r#"{"artifact":"graph","node_counts":{"a":1,"b":1},
            "relations":[{"triplet":{"src":"a","relation":"r","dst":"b"},
            "edges":{"src":[0],"dst":[5]}}]}"#;
        let err = decode_artifact(json.as_bytes(), DEFAULT_MAX_ARTIFACT_SIZE)
            .expect_err("index out of range");
        assert!(matches!(err, PersistError::Json(_)), "{err}");
    }

    #[test]
    fn load_enforces_size_limit() {
        let bytes = encode_artifact(&Artifact::Graph(graph()), Encoding::Json, false)
            .expect("encode");
        let err = load(bytes.as_slice(), 16).expect_err("too large");
        assert!(matches!(err, PersistError::TooLarge { limit: 16 }));
    }

    #[test]
    fn fingerprint_ignores_encoding() {
        let artifact = Artifact::Split(train_split());
        let json = encode_artifact(&artifact, Encoding::Json, false).expect("json");
        let cbor = encode_artifact(&artifact, Encoding::Cbor, false).expect("cbor");
        let a = fingerprint(&decode_artifact(&json, DEFAULT_MAX_ARTIFACT_SIZE).expect("a"))
            .expect("fp a");
        let b = fingerprint(&decode_artifact(&cbor, DEFAULT_MAX_ARTIFACT_SIZE).expect("b"))
            .expect("fp b");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn file_names_follow_convention() {
        assert_eq!(artifact_file_name("train", Encoding::Json, false), "train.json");
        assert_eq!(
            artifact_file_name(FULL_DATASET_STEM, Encoding::Cbor, true),
            "full_dataset.cbor.zst"
        );
        assert_eq!(split_stems(), ["train", "validation", "test"]);
    }

    #[test]
    fn hex_encode_mixed_bytes() {
        assert_eq!(hex_encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
    }
}
