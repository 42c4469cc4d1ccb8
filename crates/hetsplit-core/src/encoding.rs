//! Artifact encodings and header sniffing.
//!
//! Every persisted artifact is a map whose first key is [`ARTIFACT_TAG`].
//! [`sniff_artifact`] reads just enough of a buffer to name its encoding and
//! confirm that header, so a stray JSON or CBOR file is rejected before the
//! full deserializer runs.

/// Key that leads every encoded artifact and names its variant.
pub const ARTIFACT_TAG: &str = "artifact";

/// Serialization encoding of a persisted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// JSON encoding.
    Json,
    /// CBOR encoding, identified by self-describing tag 55799.
    Cbor,
    /// zstd-compressed payload; decompress then sniff the inner encoding.
    Zstd,
}

impl Encoding {
    /// File extension for this encoding, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Cbor => "cbor",
            Encoding::Zstd => "zst",
        }
    }
}

/// Why a buffer is not recognised as an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// The buffer is empty or whitespace only.
    Empty,
    /// The leading bytes match neither zstd, tagged CBOR, nor a JSON object.
    UnknownEncoding {
        /// Up to four leading bytes.
        first_bytes: Vec<u8>,
    },
    /// The encoding is known but the document does not open with the
    /// artifact tag.
    MissingTag {
        /// The encoding that was recognised.
        encoding: Encoding,
    },
}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderError::Empty => write!(f, "empty input is not an artifact"),
            HeaderError::UnknownEncoding { first_bytes } => write!(
                f,
                "unrecognized encoding: first bytes are {first_bytes:02X?}"
            ),
            HeaderError::MissingTag { encoding } => write!(
                f,
                "{} document is not an artifact: its first key must be `{ARTIFACT_TAG}`",
                encoding.extension()
            ),
        }
    }
}

impl std::error::Error for HeaderError {}

pub(crate) const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
pub(crate) const CBOR_TAG: [u8; 3] = [0xD9, 0xD9, 0xF7];

const CBOR_MAJOR_MAP: u8 = 5;
const CBOR_MAJOR_TEXT: u8 = 3;

/// Names the encoding of an artifact buffer and checks its header.
///
/// - zstd magic (`28 B5 2F FD`) yields [`Encoding::Zstd`]; the frame is not
///   opened, so its payload must be sniffed again after decompression.
/// - CBOR tag 55799 (`D9 D9 F7`) must be followed by a map whose first key
///   is the text [`ARTIFACT_TAG`].
/// - Otherwise, after leading whitespace, the buffer must be a JSON object
///   whose first key is `"artifact"`.
///
/// # Errors
///
/// Returns [`HeaderError`] describing the first mismatch.
pub fn sniff_artifact(bytes: &[u8]) -> Result<Encoding, HeaderError> {
    if bytes.starts_with(&ZSTD_MAGIC) {
        return Ok(Encoding::Zstd);
    }
    if let Some(body) = bytes.strip_prefix(CBOR_TAG.as_slice()) {
        return if cbor_opens_with_tag(body) {
            Ok(Encoding::Cbor)
        } else {
            Err(HeaderError::MissingTag {
                encoding: Encoding::Cbor,
            })
        };
    }

    let trimmed = bytes.trim_ascii_start();
    match trimmed.first() {
        None => Err(HeaderError::Empty),
        Some(b'{') => {
            let key = format!("\"{ARTIFACT_TAG}\"");
            if trimmed[1..].trim_ascii_start().starts_with(key.as_bytes()) {
                Ok(Encoding::Json)
            } else {
                Err(HeaderError::MissingTag {
                    encoding: Encoding::Json,
                })
            }
        }
        Some(_) => Err(HeaderError::UnknownEncoding {
            first_bytes: bytes.iter().copied().take(4).collect(),
        }),
    }
}

/// Checks for a map header followed by the text-string key `artifact`.
fn cbor_opens_with_tag(body: &[u8]) -> bool {
    let Some((&head, rest)) = body.split_first() else {
        return false;
    };
    if head >> 5 != CBOR_MAJOR_MAP {
        return false;
    }
    let length_bytes = match head & 0x1F {
        0..=23 | 31 => 0,
        24 => 1,
        25 => 2,
        26 => 4,
        27 => 8,
        _ => return false,
    };
    let Some(rest) = rest.get(length_bytes..) else {
        return false;
    };

    let tag = ARTIFACT_TAG.as_bytes();
    // Tag is shorter than 24 bytes, so its length fits in the initial byte.
    let text_head = (CBOR_MAJOR_TEXT << 5) | tag.len() as u8;
    rest.first() == Some(&text_head) && rest[1..].starts_with(tag)
}
