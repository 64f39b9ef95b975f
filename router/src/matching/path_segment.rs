use crate::params::ParamType;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that are percent-encoded in the path of a parsed URL.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One `/`-separated piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Matches exactly this text. Stored encoded the way a parsed URL path
    /// is, so it can be compared against one directly.
    Static(String),
    /// `:name` or `:name<type>`: matches any single segment.
    Param { name: String, ty: ParamType },
    /// A trailing `*`: matches whatever follows.
    Wildcard,
}

impl PathSegment {
    pub(crate) fn parse(segment: &str) -> Self {
        let Some(param) = segment.strip_prefix(':') else {
            return PathSegment::Static(
                utf8_percent_encode(segment, PATH).to_string(),
            );
        };
        let (name, ty) =
            match param.strip_suffix('>').and_then(|p| p.split_once('<')) {
                Some((name, ty)) => (name, parse_type(name, ty)),
                None => (param, ParamType::String),
            };
        PathSegment::Param {
            name: name.to_string(),
            ty,
        }
    }
}

fn parse_type(name: &str, ty: &str) -> ParamType {
    ty.parse().unwrap_or_else(|unknown| {
        tracing::warn!(
            param = name,
            "unknown parameter type {unknown:?}, treating it as a string"
        );
        ParamType::String
    })
}
