use super::PathSegment;
use crate::{
    location::{normalize_path, Query, QueryValue, Url},
    params::ParamsMap,
};
use core::fmt;
use std::{borrow::Cow, str::FromStr};
use url::form_urlencoded;

/// A query key a pattern requires, optionally with the exact value it must
/// have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConstraint {
    pub key: String,
    /// `None` requires only that the key is present.
    pub value: Option<String>,
}

impl QueryConstraint {
    fn is_satisfied_by(&self, query: &Query) -> bool {
        match (query.get(&self.key), &self.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(QueryValue::One(actual)), Some(expected)) => {
                actual == expected
            }
            (Some(QueryValue::Many(_)), Some(_)) => false,
        }
    }
}

/// A compiled route pattern such as `/users/:id<number>/*?tab=posts`.
///
/// - A trailing `*` matches any remainder of the path; a `*` anywhere else
///   is an ordinary character.
/// - `:name` matches one segment, including an empty one. `:name<type>`
///   converts the segment to `string`, `number`, `date` or `boolean`.
/// - The query part lists keys the location must carry. `?key` requires the
///   key, `?key=value` requires that exact value.
/// - Any `#fragment` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    path: String,
    segments: Vec<PathSegment>,
    depth: Option<usize>,
    query: Vec<QueryConstraint>,
}

impl RoutePattern {
    pub fn new(pattern: &str) -> Self {
        let raw = pattern.to_string();
        let pattern = pattern.split_once('#').map_or(pattern, |(p, _)| p);
        let (path, search) = pattern.split_once('?').unwrap_or((pattern, ""));

        let mut path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        path.truncate(normalize_path(&path).len());

        let wildcard = path.ends_with('*');
        if wildcard {
            path.pop();
            if path.len() > 1 && path.ends_with('/') {
                path.pop();
            }
        }

        let mut segments = path[1..]
            .split('/')
            .map(PathSegment::parse)
            .collect::<Vec<_>>();
        let depth = wildcard
            .then(|| path[1..].split('/').filter(|s| !s.is_empty()).count());
        if wildcard {
            segments.push(PathSegment::Wildcard);
        }

        // the pattern path in the same encoding as a parsed URL
        let path = segments
            .iter()
            .filter_map(|segment| match segment {
                PathSegment::Static(s) => Some(s.as_str()),
                PathSegment::Param { .. } => None,
                PathSegment::Wildcard => None,
            })
            .fold(String::new(), |mut path, s| {
                path.push('/');
                path.push_str(s);
                path
            });
        let path = if path.is_empty() { "/".to_string() } else { path };

        let query = form_urlencoded::parse(search.as_bytes())
            .map(|(key, value)| QueryConstraint {
                key: key.into_owned(),
                value: (!value.is_empty()).then(|| value.into_owned()),
            })
            .collect();

        Self {
            raw,
            path,
            segments,
            depth,
            query,
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn query(&self) -> &[QueryConstraint] {
        &self.query
    }

    pub fn is_wildcard(&self) -> bool {
        self.depth.is_some()
    }

    /// Number of non-empty path segments before a trailing wildcard.
    pub fn wildcard_depth(&self) -> Option<usize> {
        self.depth
    }

    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, PathSegment::Param { .. }))
    }

    /// Tests a location against this pattern, returning the extracted
    /// parameters on a match.
    pub fn test(&self, url: &Url) -> Option<ParamsMap> {
        let mut params = ParamsMap::new();
        self.match_into(url, &mut params).then_some(params)
    }

    /// Like [`test`](Self::test), but merges parameters into an existing
    /// map. `params` is left untouched unless the whole pattern matches.
    pub fn match_into(&self, url: &Url, params: &mut ParamsMap) -> bool {
        let path = normalize_path(url.path());
        let path = match self.depth {
            Some(depth) => truncate(path, depth),
            None => Cow::Borrowed(path),
        };

        let matched = self.query.iter().all(|c| c.is_satisfied_by(url.query()))
            && if self.has_params() {
                self.match_segments(&path, params)
            } else {
                path == self.path
            };
        tracing::trace!(pattern = %self.raw, path = %path, matched);
        matched
    }

    fn match_segments(&self, path: &str, params: &mut ParamsMap) -> bool {
        let pattern = match self.segments.split_last() {
            Some((PathSegment::Wildcard, rest)) => rest,
            _ => &self.segments[..],
        };
        let parts = path.strip_prefix('/').unwrap_or(path).split('/');
        if parts.clone().count() != pattern.len() {
            return false;
        }

        let mut found = Vec::new();
        for (segment, part) in pattern.iter().zip(parts) {
            match segment {
                PathSegment::Param { name, ty } => {
                    found.push((name, ty.convert(part)))
                }
                PathSegment::Static(s) if s == part => {}
                _ => return false,
            }
        }
        for (name, value) in found {
            params.insert(name.as_str(), value);
        }
        true
    }
}

/// Keeps the first `depth` non-empty segments of a path.
fn truncate(path: &str, depth: usize) -> Cow<'_, str> {
    let kept = path
        .split('/')
        .filter(|s| !s.is_empty())
        .take(depth)
        .collect::<Vec<_>>();
    Cow::Owned(format!("/{}", kept.join("/")))
}

/// Tests `url` against a pattern string in one go.
pub fn match_path(pattern: &str, url: &Url) -> Option<ParamsMap> {
    RoutePattern::new(pattern).test(url)
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl FromStr for RoutePattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
