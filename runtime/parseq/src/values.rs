use indexmap::IndexMap;
use indexmap::map::Entry;

/// The percent-decoded query parameters of a request, grouped by name.
///
/// Every name maps to a **non-empty** sequence of values, in the order they
/// appeared in the query string.
/// A name that appears more than once (e.g. `?room_id=1&room_id=2`) is a
/// multi-value parameter.
///
/// `QueryValues` does not parse raw query strings: it expects its caller to do
/// the tokenizing and percent-decoding.
///
/// # Example
///
/// ```rust
/// use parseq::QueryValues;
///
/// let values: QueryValues = [("room_id", "1"), ("room_id", "2"), ("name", "home")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(values.get("room_id"), Some(&["1".to_string(), "2".to_string()][..]));
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryValues(IndexMap<String, Vec<String>>);

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the sequence stored under `name`, creating it if needed.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        match self.0.entry(name.into()) {
            Entry::Occupied(mut e) => e.get_mut().push(value.into()),
            Entry::Vacant(e) => {
                e.insert(vec![value.into()]);
            }
        }
    }

    /// Replace the sequence stored under `name`.
    ///
    /// An empty `values` is ignored, since every name must carry at least one value.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        self.0.insert(name.into(), values);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        values.extend(iter);
        values
    }
}

impl<K, V> Extend<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}
