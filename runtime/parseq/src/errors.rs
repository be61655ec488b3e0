//! Errors that can happen when decoding query parameters into a record.
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;

/// The error returned by [`Decoder::decode_dyn`] when decoding fails.
///
/// See the documentation of each variant for more details.
///
/// [`Decoder::decode_dyn`]: crate::Decoder::decode_dyn
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    /// See [`TypeError`] for details.
    Type(TypeError),
    #[error(transparent)]
    /// See [`FieldErrors`] for details.
    Fields(FieldErrors),
}

impl From<TypeError> for DecodeError {
    fn from(e: TypeError) -> Self {
        Self::Type(e)
    }
}

impl From<FieldErrors> for DecodeError {
    fn from(e: FieldErrors) -> Self {
        Self::Fields(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parseq: must be pointer to struct")]
/// The destination handed to [`Decoder::decode_dyn`] is not a record type
/// known to the [`Registry`].
///
/// No field is processed when this error is returned.
///
/// [`Decoder::decode_dyn`]: crate::Decoder::decode_dyn
/// [`Registry`]: crate::Registry
pub struct TypeError {
    pub(crate) type_id: TypeId,
}

impl TypeError {
    /// The [`TypeId`] of the rejected destination.
    pub fn destination_type_id(&self) -> TypeId {
        self.type_id
    }
}

/// A single field's values could not be coerced into the field's type.
///
/// The offending raw value is kept for diagnostics, but it is not part of the
/// rendered message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("not a valid boolean")]
    InvalidBoolean { raw: String },
    #[error("not a valid integer")]
    InvalidInteger { raw: String },
    #[error("not a valid unsigned integer")]
    InvalidUnsignedInteger { raw: String },
}

impl FormatError {
    /// The raw value that failed to coerce.
    pub fn raw(&self) -> &str {
        match self {
            FormatError::InvalidBoolean { raw }
            | FormatError::InvalidInteger { raw }
            | FormatError::InvalidUnsignedInteger { raw } => raw,
        }
    }
}

/// All the coercion failures collected during a single decode call, keyed by the
/// external name of the field that failed.
///
/// It renders as `name: message` entries, in ascending order of name,
/// separated by `; `.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, FormatError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `name`, replacing any earlier failure under the same name.
    pub fn insert(&mut self, name: impl Into<String>, error: FormatError) {
        self.0.insert(name.into(), error);
    }

    /// Merge `other` into `self`. On name collisions, `other` wins.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn get(&self, name: &str) -> Option<&FormatError> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, error)` pairs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormatError)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Ok(())` if no failure was recorded, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = (String, FormatError);
    type IntoIter = std::collections::btree_map::IntoIter<String, FormatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
