use url::form_urlencoded;

/// The value of a query key: a single string, or every value of a key that
/// appeared more than once, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// Returns the value if this key appeared exactly once.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            QueryValue::One(v) => Some(v),
            QueryValue::Many(_) => None,
        }
    }

    /// All values of this key, in order.
    pub fn values(&self) -> &[String] {
        match self {
            QueryValue::One(v) => std::slice::from_ref(v),
            QueryValue::Many(vs) => vs,
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::One(prev) => {
                let prev = std::mem::take(prev);
                *self = QueryValue::Many(vec![prev, value]);
            }
            QueryValue::Many(vs) => vs.push(value),
        }
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::Many(value)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(value: Vec<&str>) -> Self {
        QueryValue::Many(value.into_iter().map(String::from).collect())
    }
}

impl PartialEq<str> for QueryValue {
    fn eq(&self, other: &str) -> bool {
        self.as_single() == Some(other)
    }
}

impl PartialEq<&str> for QueryValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_single() == Some(*other)
    }
}

/// The query part of a [`Url`](super::Url), keyed in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Query(Vec<(String, QueryValue)>);

impl Query {
    /// Creates an empty query.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the query.
    ///
    /// If the key already exists, its value becomes a sequence holding every
    /// value in the order added. To overwrite instead, see [`replace`].
    ///
    /// [`replace`]: Query::replace
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, prev)) => {
                for v in value.values() {
                    prev.push(v.clone());
                }
            }
            None => self.0.push((key, value)),
        }
    }

    /// Sets the value of a key, keeping its position if it already exists.
    pub fn replace(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, prev)) => *prev = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0
            .iter()
            .find_map(|(k, v)| if k == key { Some(v) } else { None })
    }

    /// Gets the most-recently-added value of this key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|v| v.values().last())
            .map(String::as_str)
    }

    /// Gets every value of this key.
    pub fn get_all(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(|v| v.values().to_vec())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parses a raw query string (with or without its leading `?`).
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        form_urlencoded::parse(search.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Serializes the query without its leading `?`.
    ///
    /// Empty values are dropped, and a key whose values are all empty is
    /// omitted entirely.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, value) in &self.0 {
            for v in value.values().iter().filter(|v| !v.is_empty()) {
                serializer.append_pair(k, v);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl IntoIterator for Query {
    type Item = (String, QueryValue);
    type IntoIter = std::vec::IntoIter<(String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
