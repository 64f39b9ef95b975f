use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

/// The type annotation of a named parameter, as in `:id<number>`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

impl ParamType {
    /// Converts a raw path segment into a value of this type.
    ///
    /// Conversion never fails: unparseable numbers become `NaN`, unparseable
    /// dates become `ParamValue::Date(None)` and anything other than the
    /// literal `"true"` is `false`.
    pub fn convert(self, raw: &str) -> ParamValue {
        match self {
            ParamType::String => ParamValue::Str(raw.to_string()),
            ParamType::Number => ParamValue::Number(parse_number(raw)),
            ParamType::Date => ParamValue::Date(parse_date(raw)),
            ParamType::Boolean => ParamValue::Bool(raw == "true"),
        }
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ParamType::String),
            "number" => Ok(ParamType::Number),
            "date" => Ok(ParamType::Date),
            "boolean" => Ok(ParamType::Boolean),
            other => Err(other.to_string()),
        }
    }
}

fn parse_number(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // date-time forms without an offset are read as UTC
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A typed parameter value extracted from a path.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Number(f64),
    /// `None` marks an invalid date.
    Date(Option<DateTime<Utc>>),
    Bool(bool),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            ParamValue::Date(d) => *d,
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Date(Some(d)) => f.write_str(&d.to_rfc3339()),
            ParamValue::Date(None) => f.write_str("Invalid Date"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Date(Some(value))
    }
}

/// Parameters extracted by a successful match, in pattern order.
///
/// Keys are unique. For now, implemented with a `Vec`, as `n` is small enough
/// that linear lookup beats hashing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParamsMap(Vec<(String, ParamValue)>);

impl ParamsMap {
    /// Creates an empty map.
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map with the given capacity.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Inserts a value, replacing and returning any previous value for `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(prev) => Some(std::mem::replace(&mut prev.1, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .find_map(|(k, v)| if k == key { Some(v) } else { None })
    }

    /// Gets a parameter that was captured as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merges `other` into `self`; values from `other` win on conflict.
    pub fn extend_from(&mut self, other: &ParamsMap) {
        for (k, v) in &other.0 {
            self.insert(k.clone(), v.clone());
        }
    }

    /// Deserializes the map into a concrete type.
    pub fn read<T: Params>(&self) -> Result<T, ParamsError> {
        T::from_map(self)
    }
}

impl<K, V> FromIterator<(K, V)> for ParamsMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ParamsMap {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A simple method of deserializing matched route params into a concrete
/// data type. `Self` should typically be a struct in which each field's type
/// implements [`IntoParam`].
pub trait Params
where
    Self: Sized,
{
    /// Attempts to deserialize the map into the given type.
    fn from_map(map: &ParamsMap) -> Result<Self, ParamsError>;
}

impl Params for () {
    #[inline(always)]
    fn from_map(_map: &ParamsMap) -> Result<Self, ParamsError> {
        Ok(())
    }
}

impl Params for ParamsMap {
    fn from_map(map: &ParamsMap) -> Result<Self, ParamsError> {
        Ok(map.clone())
    }
}

pub trait IntoParam
where
    Self: Sized,
{
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError>;
}

fn required<'a>(
    value: Option<&'a ParamValue>,
    name: &str,
) -> Result<&'a ParamValue, ParamsError> {
    value.ok_or_else(|| ParamsError::MissingParam(name.to_string()))
}

fn unexpected(name: &str, expected: &'static str) -> ParamsError {
    ParamsError::UnexpectedType {
        name: name.to_string(),
        expected,
    }
}

impl<T> IntoParam for Option<T>
where
    T: IntoParam,
{
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        match value {
            None => Ok(None),
            Some(value) => T::into_param(Some(value), name).map(Some),
        }
    }
}

impl IntoParam for String {
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        Ok(required(value, name)?.to_string())
    }
}

impl IntoParam for f64 {
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        match required(value, name)? {
            ParamValue::Number(n) => Ok(*n),
            ParamValue::Str(s) => s
                .parse()
                .map_err(|e| ParamsError::Params(Arc::new(e))),
            _ => Err(unexpected(name, "number")),
        }
    }
}

impl IntoParam for i64 {
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        match required(value, name)? {
            ParamValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                Ok(*n as i64)
            }
            ParamValue::Str(s) => s
                .parse()
                .map_err(|e| ParamsError::Params(Arc::new(e))),
            _ => Err(unexpected(name, "integer")),
        }
    }
}

impl IntoParam for bool {
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        match required(value, name)? {
            ParamValue::Bool(b) => Ok(*b),
            ParamValue::Str(s) => s
                .parse()
                .map_err(|e| ParamsError::Params(Arc::new(e))),
            _ => Err(unexpected(name, "boolean")),
        }
    }
}

impl IntoParam for DateTime<Utc> {
    fn into_param(
        value: Option<&ParamValue>,
        name: &str,
    ) -> Result<Self, ParamsError> {
        match required(value, name)? {
            ParamValue::Date(Some(d)) => Ok(*d),
            ParamValue::Str(s) => {
                parse_date(s).ok_or_else(|| unexpected(name, "date"))
            }
            _ => Err(unexpected(name, "date")),
        }
    }
}

/// Errors that can occur while reading params using [`Params`].
#[derive(Error, Debug, Clone)]
pub enum ParamsError {
    /// A field was missing from the route params.
    #[error("could not find parameter {0}")]
    MissingParam(String),
    /// A field held a value of another type.
    #[error("parameter {name} is not a valid {expected}")]
    UnexpectedType { name: String, expected: &'static str },
    /// Something went wrong while deserializing a field.
    #[error("failed to deserialize parameters")]
    Params(Arc<dyn std::error::Error + Send + Sync>),
}

impl PartialEq for ParamsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingParam(l0), Self::MissingParam(r0)) => l0 == r0,
            (
                Self::UnexpectedType {
                    name: l0,
                    expected: l1,
                },
                Self::UnexpectedType {
                    name: r0,
                    expected: r1,
                },
            ) => l0 == r0 && l1 == r1,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_numbers() {
        assert_eq!(ParamType::Number.convert("42"), ParamValue::Number(42.0));
        assert_eq!(
            ParamType::Number.convert("-1.5"),
            ParamValue::Number(-1.5)
        );
        let nan = ParamType::Number.convert("abc").as_number().unwrap();
        assert!(nan.is_nan());
    }

    #[test]
    fn converts_booleans_literally() {
        assert_eq!(ParamType::Boolean.convert("true"), ParamValue::Bool(true));
        assert_eq!(
            ParamType::Boolean.convert("false"),
            ParamValue::Bool(false)
        );
        assert_eq!(ParamType::Boolean.convert("TRUE"), ParamValue::Bool(false));
        assert_eq!(ParamType::Boolean.convert("1"), ParamValue::Bool(false));
    }

    #[test]
    fn converts_dates() {
        let day = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(ParamType::Date.convert("2024-03-01").as_date(), Some(day));
        assert_eq!(
            ParamType::Date
                .convert(&day.timestamp_millis().to_string())
                .as_date(),
            Some(day)
        );
        assert_eq!(
            ParamType::Date.convert("2024-03-01T10:30:00Z").as_date(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            ParamType::Date.convert("yesterday"),
            ParamValue::Date(None)
        );
    }

    #[test]
    fn unknown_type_names_are_rejected() {
        assert_eq!("number".parse::<ParamType>(), Ok(ParamType::Number));
        assert!("int".parse::<ParamType>().is_err());
    }

    #[test]
    fn insert_replaces_existing_keys() {
        let mut map = ParamsMap::new();
        assert_eq!(map.insert("id", "1"), None);
        assert_eq!(map.insert("id", "2"), Some(ParamValue::from("1")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_str("id"), Some("2"));
    }

    #[test]
    fn extend_from_prefers_incoming_values() {
        let mut parent: ParamsMap =
            [("org", "acme"), ("id", "1")].into_iter().collect();
        let child: ParamsMap = [("id", "2")].into_iter().collect();
        parent.extend_from(&child);
        assert_eq!(parent.get_str("org"), Some("acme"));
        assert_eq!(parent.get_str("id"), Some("2"));
    }

    #[derive(Debug, PartialEq)]
    struct BookParams {
        id: f64,
        slug: String,
        draft: Option<bool>,
    }

    impl Params for BookParams {
        fn from_map(map: &ParamsMap) -> Result<Self, ParamsError> {
            Ok(Self {
                id: f64::into_param(map.get("id"), "id")?,
                slug: String::into_param(map.get("slug"), "slug")?,
                draft: Option::<bool>::into_param(map.get("draft"), "draft")?,
            })
        }
    }

    #[test]
    fn reads_params_into_struct() {
        let mut map = ParamsMap::new();
        map.insert("id", 7.0);
        map.insert("slug", "intro");
        assert_eq!(
            map.read::<BookParams>(),
            Ok(BookParams {
                id: 7.0,
                slug: "intro".into(),
                draft: None
            })
        );
    }

    #[test]
    fn reports_missing_params() {
        let map: ParamsMap = [("id", 1.0)].into_iter().collect();
        assert_eq!(
            map.read::<BookParams>(),
            Err(ParamsError::MissingParam("slug".into()))
        );
    }

    #[test]
    fn reports_wrong_types() {
        let mut map = ParamsMap::new();
        map.insert("id", true);
        map.insert("slug", "intro");
        assert_eq!(
            map.read::<BookParams>(),
            Err(ParamsError::UnexpectedType {
                name: "id".into(),
                expected: "number"
            })
        );
    }
}
