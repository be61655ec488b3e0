//! The field-descriptor model: how a record exposes its fields to the [`Decoder`].
//!
//! [`Decoder`]: crate::Decoder
use crate::coerce::{ArraySlot, SignedSlot, UnsignedSlot};

/// A record whose fields can be populated from query parameters.
///
/// You will rarely implement this trait by hand: derive it with
/// [`#[derive(QueryRecord)]`](derive@crate::QueryRecord).
///
/// # Example
///
/// ```rust
/// use parseq::{Field, QueryRecord, QueryValues, Slot, Tags};
///
/// #[derive(Default)]
/// pub struct Page {
///     size: u32,
///     cursor: String,
/// }
///
/// impl QueryRecord for Page {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("size", Tags::new().query("page_size"), Slot::Unsigned(&mut self.size)),
///             Field::new("cursor", Tags::new(), Slot::String(&mut self.cursor)),
///         ]
///     }
/// }
///
/// let values: QueryValues = [("page_size", "20"), ("cursor", "abc")].into_iter().collect();
/// let mut page = Page::default();
/// parseq::decode(&values, &mut page).unwrap();
/// assert_eq!(page.size, 20);
/// assert_eq!(page.cursor, "abc");
/// ```
pub trait QueryRecord {
    /// The fields of the record, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

impl<T: QueryRecord + ?Sized> QueryRecord for Box<T> {
    fn fields(&mut self) -> Vec<Field<'_>> {
        (**self).fields()
    }
}

/// A single field of a [`QueryRecord`].
pub struct Field<'a> {
    pub(crate) ident: &'static str,
    pub(crate) tags: Tags,
    pub(crate) slot: Slot<'a>,
}

impl<'a> Field<'a> {
    /// `ident` is the field's declared identifier, used as external name when
    /// `tags` doesn't provide one.
    pub fn new(ident: &'static str, tags: Tags, slot: Slot<'a>) -> Self {
        Self { ident, tags, slot }
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn slot(&self) -> &Slot<'a> {
        &self.slot
    }
}

/// The raw naming annotations attached to a field.
///
/// Each annotation is a comma-separated list: the first segment, trimmed, is
/// the external name. The remaining segments are ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tags {
    query: Option<&'static str>,
    json: Option<&'static str>,
    parseq: Option<&'static str>,
}

impl Tags {
    pub const fn new() -> Self {
        Self {
            query: None,
            json: None,
            parseq: None,
        }
    }

    /// Set the `query` annotation, e.g. `"page_size"` or `"page_size,omitempty"`.
    pub const fn query(mut self, tag: &'static str) -> Self {
        self.query = Some(tag);
        self
    }

    /// Set the `json` annotation. It is only consulted if `query` yields no name.
    pub const fn json(mut self, tag: &'static str) -> Self {
        self.json = Some(tag);
        self
    }

    /// Set the legacy `parseq` annotation.
    /// It is only honored, as an exclusion marker, when
    /// `legacy_exclusion_tag` is set in [`DecoderConfig`](crate::DecoderConfig).
    pub const fn parseq(mut self, tag: &'static str) -> Self {
        self.parseq = Some(tag);
        self
    }

    pub(crate) fn query_name(&self) -> Option<&'static str> {
        self.query.map(first_segment)
    }

    pub(crate) fn json_name(&self) -> Option<&'static str> {
        self.json.map(first_segment)
    }

    pub(crate) fn parseq_name(&self) -> Option<&'static str> {
        self.parseq.map(first_segment)
    }
}

fn first_segment(tag: &'static str) -> &'static str {
    tag.split(',').next().unwrap_or_default().trim()
}

/// Exclusive access to the storage of a field, tagged with how it must be coerced.
///
/// The set of kinds is closed, and each kind only accepts the field types it
/// can coerce into:
///
/// ```rust,compile_fail
/// use parseq::Slot;
///
/// let mut signed = 0i32;
/// // `i32` is not an unsigned integer.
/// let _ = Slot::Unsigned(&mut signed);
/// ```
///
/// ```rust,compile_fail
/// use parseq::Slot;
///
/// let mut text = String::new();
/// let _ = Slot::Signed(&mut text);
/// ```
///
/// [`Slot::Unsupported`] marks a field whose type is none of the others: the
/// decoder never touches it and never reports an error for it.
pub enum Slot<'a> {
    /// Takes the first value, verbatim.
    String(&'a mut String),
    /// Takes the first value, parsed as a boolean literal.
    Bool(&'a mut bool),
    /// Takes the first value, parsed as a base-10 signed integer.
    Signed(&'a mut dyn SignedSlot),
    /// Takes the first value, parsed as a base-10 unsigned integer.
    Unsigned(&'a mut dyn UnsignedSlot),
    /// Takes every value, trimmed, each coerced into the element type.
    Array(&'a mut dyn ArraySlot),
    /// A sub-record whose fields live in the same namespace as its parent's.
    Embedded(&'a mut dyn QueryRecord),
    /// Silently skipped.
    Unsupported,
}

impl Slot<'_> {
    /// A short human-readable name for the kind of this slot.
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::String(_) => "string",
            Slot::Bool(_) => "bool",
            Slot::Signed(_) => "signed integer",
            Slot::Unsigned(_) => "unsigned integer",
            Slot::Array(_) => "array",
            Slot::Embedded(_) => "embedded record",
            Slot::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.kind())
    }
}

impl std::fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("ident", &self.ident)
            .field("tags", &self.tags)
            .field("slot", &self.slot)
            .finish()
    }
}

// Not public API, used by the code generated by `#[derive(QueryRecord)]`.
#[doc(hidden)]
pub mod __private {
    use super::QueryRecord;

    /// View an optional sub-record as a record, allocating it first if it's unset.
    pub fn embed_optional<T>(slot: &mut Option<T>) -> &mut dyn QueryRecord
    where
        T: QueryRecord + Default,
    {
        slot.get_or_insert_with(Default::default)
    }
}
