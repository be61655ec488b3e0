#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how a [`Decoder`](crate::Decoder) resolves field names.
///
/// Every key is optional when deserializing; missing keys take their default.
pub struct DecoderConfig {
    /// Look at the `json` annotation of a field when its `query` annotation
    /// is missing or has an empty name.
    ///
    /// # Default
    ///
    /// `true`.
    #[serde(default = "default_json_fallback")]
    pub json_fallback: bool,
    /// Treat a `parseq` annotation whose name is `-` as an exclusion marker,
    /// on top of `query` and `json`.
    ///
    /// Records written against older releases marked excluded fields with
    /// `#[parseq = "-"]`. Enable this to keep them excluded.
    ///
    /// # Default
    ///
    /// `false`.
    #[serde(default)]
    pub legacy_exclusion_tag: bool,
    /// How many levels of embedded sub-records the decoder will descend into.
    /// Deeper sub-records are skipped and a warning is emitted.
    ///
    /// The limit is checked when the decoder reaches an embedded field, after its
    /// parent has listed its fields. An unset optional sub-record right past the
    /// limit is therefore still allocated with its default value, but none of its
    /// fields are decoded.
    ///
    /// # Default
    ///
    /// 32.
    #[serde(default = "default_max_embedding_depth")]
    pub max_embedding_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            json_fallback: default_json_fallback(),
            legacy_exclusion_tag: false,
            max_embedding_depth: default_max_embedding_depth(),
        }
    }
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `json_fallback` field.
    pub fn json_fallback(mut self, enabled: bool) -> Self {
        self.json_fallback = enabled;
        self
    }

    /// Set the `legacy_exclusion_tag` field.
    pub fn legacy_exclusion_tag(mut self, enabled: bool) -> Self {
        self.legacy_exclusion_tag = enabled;
        self
    }

    /// Set the `max_embedding_depth` field.
    pub fn max_embedding_depth(mut self, depth: usize) -> Self {
        self.max_embedding_depth = depth;
        self
    }
}

fn default_json_fallback() -> bool {
    true
}

fn default_max_embedding_depth() -> usize {
    32
}
