/// Validated newtype wrappers for the label strings that key the graph.
///
/// Each newtype rejects empty and whitespace-padded labels at construction
/// time via [`TryFrom<&str>`]. Once constructed, the inner value is immutable
/// (no `DerefMut`). Serde `Deserialize` impls re-run validation so a persisted
/// artifact cannot smuggle an invalid label back into the type system.
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a validated newtype from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewtypeError {
    /// The string was empty or consisted only of whitespace.
    Empty {
        /// Name of the type that rejected the input.
        type_name: &'static str,
    },
    /// The string carried leading or trailing whitespace.
    Padded {
        /// Name of the type that rejected the input.
        type_name: &'static str,
        /// The input that was rejected.
        got: String,
    },
}

impl fmt::Display for NewtypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { type_name } => write!(f, "invalid {type_name}: label is empty"),
            Self::Padded { type_name, got } => write!(
                f,
                "invalid {type_name}: label {got:?} has leading or trailing whitespace"
            ),
        }
    }
}

impl std::error::Error for NewtypeError {}

fn check_label(type_name: &'static str, s: &str) -> Result<(), NewtypeError> {
    if s.trim().is_empty() {
        return Err(NewtypeError::Empty { type_name });
    }
    if s.trim() != s {
        return Err(NewtypeError::Padded {
            type_name,
            got: s.to_owned(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// NodeType
// ---------------------------------------------------------------------------

/// Label identifying a class of entities, e.g. `gene_protein` or `disease`.
///
/// Node indices of a type form the contiguous range `[0, count)` local to
/// that type; the label itself carries no count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeType(String);

impl TryFrom<&str> for NodeType {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        check_label("NodeType", s)?;
        Ok(Self(s.to_owned()))
    }
}

impl Deref for NodeType {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RelationLabel
// ---------------------------------------------------------------------------

/// The middle element of a relation triplet, e.g. `gda` or `ppi`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationLabel(String);

impl TryFrom<&str> for RelationLabel {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        check_label("RelationLabel", s)?;
        Ok(Self(s.to_owned()))
    }
}

impl Deref for RelationLabel {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RelationLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RelationLabel {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RelationLabel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
