use std::any::Any;

use crate::coerce::parse_bool;
use crate::config::DecoderConfig;
use crate::errors::{DecodeError, FieldErrors, FormatError};
use crate::record::{Field, QueryRecord, Slot, Tags};
use crate::registry::Registry;
use crate::values::QueryValues;

/// The name that excludes a field from decoding.
const EXCLUDED: &str = "-";

/// Populate the fields of a [`QueryRecord`] from query parameters.
///
/// # Name resolution
///
/// Each field is looked up in the [`QueryValues`] under its external name:
///
/// - the name in its `query` annotation, if present and non-empty;
/// - otherwise, the name in its `json` annotation, if present and non-empty;
/// - otherwise, its declared identifier.
///
/// A field named `-` is never decoded.
/// A field whose name is missing from the query parameters is left untouched.
/// The fields of embedded sub-records are resolved as if they were declared
/// on the parent record: there is no prefix.
///
/// # Errors
///
/// A field that can't be coerced is left untouched and decoding moves on to the
/// next one. All failures are returned together, as [`FieldErrors`], once every
/// field has been processed.
///
/// # Example
///
/// ```rust
/// use parseq::{Decoder, QueryRecord, QueryValues};
///
/// #[derive(Default, QueryRecord)]
/// pub struct Search {
///     #[query = "q"]
///     text: String,
///     #[query = "tag"]
///     tags: Vec<String>,
///     #[json = "limit"]
///     limit: u32,
/// }
///
/// let values: QueryValues = [("q", "rust"), ("tag", "web"), ("tag", " cli "), ("limit", "10")]
///     .into_iter()
///     .collect();
/// let mut search = Search::default();
/// Decoder::default().decode(&values, &mut search).unwrap();
///
/// assert_eq!(search.text, "rust");
/// assert_eq!(search.tags, ["web", "cli"]);
/// assert_eq!(search.limit, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode `input` into `destination`.
    ///
    /// See the [type-level documentation](Self) for the details.
    #[tracing::instrument(name = "decode_query_record", level = "debug", skip_all)]
    pub fn decode<R>(&self, input: &QueryValues, destination: &mut R) -> Result<(), FieldErrors>
    where
        R: QueryRecord + ?Sized,
    {
        let errors = self.decode_fields(input, destination.fields(), 0);
        tracing::debug!(failed_fields = errors.len(), "Decoded query parameters");
        errors.into_result()
    }

    /// Decode `input` into a type-erased `destination`.
    ///
    /// A `None` destination is a no-op.
    /// It fails with [`DecodeError::Type`] if the concrete type of `destination`
    /// is not registered in `registry`; no field is processed in that case.
    pub fn decode_dyn(
        &self,
        registry: &Registry,
        input: &QueryValues,
        destination: Option<&mut dyn Any>,
    ) -> Result<(), DecodeError> {
        let Some(destination) = destination else {
            return Ok(());
        };
        let record = registry.view(destination)?;
        self.decode(input, record)?;
        Ok(())
    }

    fn decode_fields(
        &self,
        input: &QueryValues,
        fields: Vec<Field<'_>>,
        depth: usize,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for Field { ident, tags, slot } in fields {
            if let Slot::Embedded(record) = slot {
                if depth >= self.config.max_embedding_depth {
                    tracing::warn!(
                        field = ident,
                        max_depth = self.config.max_embedding_depth,
                        "Embedded record is nested too deeply, skipping it"
                    );
                    continue;
                }
                errors.merge(self.decode_fields(input, record.fields(), depth + 1));
                continue;
            }

            let name = self.external_name(ident, &tags);
            if name == EXCLUDED || self.is_legacy_excluded(&tags) {
                tracing::trace!(field = ident, "Field is excluded from decoding");
                continue;
            }
            let Some(values) = input.get(name) else {
                continue;
            };
            if let Slot::Unsupported = slot {
                tracing::trace!(field = ident, name, "Field has an unsupported type, skipping it");
                continue;
            }
            if let Err(e) = coerce(values, slot) {
                tracing::trace!(field = ident, name, error = %e, "Failed to coerce field");
                errors.insert(name, e);
            }
        }
        errors
    }

    fn external_name(&self, ident: &'static str, tags: &Tags) -> &'static str {
        if let Some(name) = tags.query_name().filter(|n| !n.is_empty()) {
            return name;
        }
        if self.config.json_fallback {
            if let Some(name) = tags.json_name().filter(|n| !n.is_empty()) {
                return name;
            }
        }
        ident
    }

    fn is_legacy_excluded(&self, tags: &Tags) -> bool {
        self.config.legacy_exclusion_tag && tags.parseq_name() == Some(EXCLUDED)
    }
}

/// Decode `input` into `destination` using the default [`Decoder`].
pub fn decode<R>(input: &QueryValues, destination: &mut R) -> Result<(), FieldErrors>
where
    R: QueryRecord + ?Sized,
{
    Decoder::default().decode(input, destination)
}

fn coerce(values: &[String], slot: Slot<'_>) -> Result<(), FormatError> {
    let Some(first) = values.first() else {
        return Ok(());
    };
    match slot {
        Slot::String(field) => *field = first.clone(),
        Slot::Bool(field) => *field = parse_bool(first)?,
        Slot::Signed(field) => field.set(first)?,
        Slot::Unsigned(field) => field.set(first)?,
        Slot::Array(field) => field.set(values)?,
        Slot::Embedded(_) | Slot::Unsupported => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Inner {
        int: i64,
        unsigned: u8,
    }

    impl QueryRecord for Inner {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("Int", Tags::new().query("int"), Slot::Signed(&mut self.int)),
                Field::new("Unsigned", Tags::new().json("u"), Slot::Unsigned(&mut self.unsigned)),
            ]
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Outer {
        inner: Inner,
        flag: bool,
        names: Vec<String>,
        ratio: f64,
        skipped: String,
        legacy: String,
    }

    impl QueryRecord for Outer {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("inner", Tags::new(), Slot::Embedded(&mut self.inner)),
                Field::new("Flag", Tags::new().query("flag").json("ignored"), Slot::Bool(&mut self.flag)),
                Field::new("Names", Tags::new().query(" name ,omitempty"), Slot::Array(&mut self.names)),
                Field::new("Ratio", Tags::new(), Slot::Unsupported),
                Field::new("Skipped", Tags::new().json("-"), Slot::String(&mut self.skipped)),
                Field::new("Legacy", Tags::new().parseq("-"), Slot::String(&mut self.legacy)),
            ]
        }
    }

    fn values(pairs: &[(&str, &str)]) -> QueryValues {
        pairs.iter().copied().collect()
    }

    #[test]
    fn embedded_fields_share_the_parent_namespace() {
        let mut outer = Outer::default();
        decode(&values(&[("int", "-4"), ("u", "7"), ("flag", "T")]), &mut outer).unwrap();
        assert_eq!(outer.inner, Inner { int: -4, unsigned: 7 });
        assert!(outer.flag);
    }

    #[test]
    fn errors_from_embedded_records_are_merged() {
        let mut outer = Outer::default();
        let errors = decode(
            &values(&[("int", "x"), ("flag", "maybe"), ("name", "a"), ("name", " b")]),
            &mut outer,
        )
        .unwrap_err();

        insta::assert_snapshot!(errors, @"flag: not a valid boolean; int: not a valid integer");
        assert_eq!(outer.names, ["a", "b"]);
        assert_eq!(outer.inner.int, 0);
        assert!(!outer.flag);
    }

    #[derive(Debug, Default)]
    struct Clash {
        top: u8,
        inner: Inner,
    }

    impl QueryRecord for Clash {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("top", Tags::new().query("int"), Slot::Unsigned(&mut self.top)),
                Field::new("inner", Tags::new(), Slot::Embedded(&mut self.inner)),
            ]
        }
    }

    #[test]
    fn the_last_failure_under_a_name_wins_across_embedding() {
        let mut clash = Clash::default();
        let errors = decode(&values(&[("int", "x")]), &mut clash).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("int"), Some(&FormatError::InvalidInteger { raw: "x".into() }));

        let errors = decode(&values(&[("int", "-1")]), &mut clash).unwrap_err();
        insta::assert_snapshot!(errors, @"int: not a valid unsigned integer");
        assert_eq!(clash.inner.int, -1);
    }

    #[test]
    fn unsupported_fields_are_skipped_silently() {
        let mut outer = Outer::default();
        decode(&values(&[("Ratio", "0.5")]), &mut outer).unwrap();
        assert_eq!(outer, Outer::default());
    }

    #[test]
    fn excluded_fields_are_never_read() {
        let mut outer = Outer::default();
        decode(&values(&[("-", "x"), ("Skipped", "x"), ("skipped", "x")]), &mut outer).unwrap();
        assert_eq!(outer.skipped, "");
    }

    #[test]
    fn the_legacy_exclusion_tag_is_opt_in() {
        let input = values(&[("Legacy", "x")]);

        let mut outer = Outer::default();
        decode(&input, &mut outer).unwrap();
        assert_eq!(outer.legacy, "x");

        let mut outer = Outer::default();
        Decoder::new(DecoderConfig::new().legacy_exclusion_tag(true))
            .decode(&input, &mut outer)
            .unwrap();
        assert_eq!(outer.legacy, "");
    }

    #[test]
    fn the_json_fallback_can_be_disabled() {
        let decoder = Decoder::new(DecoderConfig::new().json_fallback(false));

        let mut outer = Outer::default();
        decoder
            .decode(&values(&[("u", "1"), ("Unsigned", "2")]), &mut outer)
            .unwrap();
        assert_eq!(outer.inner.unsigned, 2);

        // `json = "-"` no longer excludes the field either.
        decoder
            .decode(&values(&[("Skipped", "x")]), &mut outer)
            .unwrap();
        assert_eq!(outer.skipped, "x");
    }

    #[derive(Debug, Default)]
    struct Node {
        depth: u32,
        child: Option<Box<Node>>,
    }

    impl QueryRecord for Node {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("depth", Tags::new(), Slot::Unsigned(&mut self.depth)),
                Field::new(
                    "child",
                    Tags::new(),
                    Slot::Embedded(crate::record::__private::embed_optional(&mut self.child)),
                ),
            ]
        }
    }

    #[test]
    fn embedding_depth_is_bounded() {
        let mut root = Node::default();
        Decoder::new(DecoderConfig::new().max_embedding_depth(2))
            .decode(&values(&[("depth", "9")]), &mut root)
            .unwrap();

        let child = root.child.as_ref().unwrap();
        let grandchild = child.child.as_ref().unwrap();
        assert_eq!((root.depth, child.depth, grandchild.depth), (9, 9, 9));
        // Allocated by its parent's `fields()`, but never descended into.
        let last = grandchild.child.as_ref().unwrap();
        assert_eq!(last.depth, 0);
        assert!(last.child.is_none());
    }

    #[test]
    fn type_erased_destinations_must_be_registered() {
        let mut registry = Registry::new();
        registry.register::<Outer>();
        let decoder = Decoder::default();
        let input = values(&[("flag", "1")]);

        let mut outer = Outer::default();
        decoder
            .decode_dyn(&registry, &input, Some(&mut outer))
            .unwrap();
        assert!(outer.flag);

        let mut inner = Inner::default();
        let e = decoder
            .decode_dyn(&registry, &input, Some(&mut inner))
            .unwrap_err();
        assert!(matches!(e, DecodeError::Type(_)));

        decoder.decode_dyn(&registry, &input, None).unwrap();
    }

    #[test]
    fn type_erased_field_errors_are_reported() {
        let mut registry = Registry::new();
        registry.register::<Inner>();
        let mut inner = Inner::default();
        let e = Decoder::default()
            .decode_dyn(&registry, &values(&[("u", "300")]), Some(&mut inner))
            .unwrap_err();
        let DecodeError::Fields(errors) = e else {
            panic!("expected field errors, got {e:?}");
        };
        insta::assert_snapshot!(errors, @"u: not a valid unsigned integer");
    }
}
