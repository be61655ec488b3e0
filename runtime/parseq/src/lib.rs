//! Decode multi-valued query parameters into the fields of a typed record.
//!
//! # Guide
//!
//! Derive [`QueryRecord`](derive@QueryRecord) for the type you want to populate,
//! then hand it to [`decode`] together with the percent-decoded query parameters:
//!
//! ```rust
//! use parseq::{QueryRecord, QueryValues};
//!
//! #[derive(Default, QueryRecord)]
//! pub struct Listing {
//!     #[query = "page"]
//!     page: u32,
//!     #[query = "sort,omitempty"]
//!     sort: String,
//!     #[query = "room_id"]
//!     room_ids: Vec<u64>,
//!     #[query = "-"]
//!     internal: String,
//! }
//!
//! let values: QueryValues = form_urlencoded::parse(b"page=2&room_id=1&room_id=2&internal=x")
//!     .collect();
//! let mut listing = Listing::default();
//! parseq::decode(&values, &mut listing).unwrap();
//!
//! assert_eq!(listing.page, 2);
//! assert_eq!(listing.room_ids, [1, 2]);
//! assert_eq!(listing.internal, "");
//! ```
//!
//! Tokenizing and percent-decoding the raw query string is up to you:
//! [`QueryValues`] can be collected from any iterator of `(name, value)` pairs.
//!
//! # Supported field types
//!
//! - `String`, taken verbatim from the first value;
//! - `bool`, parsed from the first value (`1`, `t`, `true`, `0`, `f`, `false`, ...);
//! - signed and unsigned primitive integers, parsed from the first value in base 10;
//! - `Vec<T>` where `T` is one of the above, built from every value after trimming it;
//! - embedded sub-records, marked with `#[parseq(flatten)]`, whose fields are looked up
//!   in the same namespace as their parent's.
//!
//! Fields of any other type are left untouched.
pub use coerce::{ArraySlot, Scalar, SignedSlot, UnsignedSlot};
pub use config::DecoderConfig;
pub use decoder::{Decoder, decode};
pub use errors::{DecodeError, FieldErrors, FormatError, TypeError};
pub use record::{Field, QueryRecord, Slot, Tags};
pub use registry::Registry;
pub use values::QueryValues;

/// Derive [`QueryRecord`](trait@QueryRecord) for a struct with named fields.
///
/// # Attributes
///
/// - `#[query = "name,opts"]`: the external name of the field.
/// - `#[json = "name,opts"]`: the external name of the field, if `query` is missing or empty.
/// - `#[parseq = "-"]`: legacy exclusion marker, only honored when
///   `legacy_exclusion_tag` is set in [`DecoderConfig`].
/// - `#[parseq(flatten)]`: the field is an embedded sub-record. Its type must be a
///   `QueryRecord`, a `Box` of one, or an `Option` of either. Optional sub-records must
///   implement `Default`: they are allocated when unset.
///
/// Only the first comma-separated segment of a name annotation is used.
/// The name `-` excludes the field from decoding.
pub use parseq_macros::QueryRecord;

mod coerce;
mod config;
mod decoder;
mod errors;
mod record;
mod registry;
mod values;

#[doc(hidden)]
pub use record::__private;
