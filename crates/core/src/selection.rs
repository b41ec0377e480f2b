//! Headquarter selection rules
//!
//! Pure functions shared by the selection holder: how a persisted
//! preference is encoded, how the initial selection is picked from a freshly
//! loaded directory, and how the selection turns into query parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::Headquarter;

/// Storage key holding the selected headquarter
pub const SELECTED_HEADQUARTER_KEY: &str = "selectedHeadquarterId";

/// Stored value meaning "all locations"
pub const ALL_HEADQUARTERS: &str = "all";

/// Query parameter carrying the scope on list/overview requests
pub const HEADQUARTER_PARAM: &str = "headquarterId";

/// Selection preference used when a directory is (re)loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Nothing usable was stored
    Unset,
    /// Explicitly "all locations"
    All,
    /// A specific location
    One(i64),
}

impl Preference {
    /// Parse a stored value. Missing or unparsable values are `Unset`.
    pub fn parse(stored: Option<&str>) -> Self {
        match stored.map(str::trim) {
            None | Some("") => Preference::Unset,
            Some(ALL_HEADQUARTERS) => Preference::All,
            Some(s) => s.parse().map(Preference::One).unwrap_or(Preference::Unset),
        }
    }

    /// Preference equivalent to an in-memory selection
    pub fn from_selection(selected: Option<i64>) -> Self {
        match selected {
            Some(id) => Preference::One(id),
            None => Preference::All,
        }
    }
}

/// Encode a selection for storage (`"all"` or the decimal id)
pub fn encode_selection(selected: Option<i64>) -> String {
    match selected {
        Some(id) => id.to_string(),
        None => ALL_HEADQUARTERS.to_string(),
    }
}

/// Pick the selection after loading `directory`.
///
/// A stored id that is still present wins. A stale id falls back to the
/// first location rather than to "all", as does a missing preference. An
/// explicit "all" is kept. An empty directory always yields "all".
pub fn resolve_selection(preference: Preference, directory: &[Headquarter]) -> Option<i64> {
    let first = directory.first().map(|hq| hq.id);
    match preference {
        Preference::All => None,
        Preference::Unset => first,
        Preference::One(id) if directory.iter().any(|hq| hq.id == id) => Some(id),
        Preference::One(_) => first,
    }
}

/// Scalar accepted as an extra query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Flat string-keyed query parameters, never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Build the parameters for a scoped request.
///
/// Adds `headquarterId` when a location is selected, then every extra whose
/// value is present. Returns `None` when nothing would be sent so callers can
/// issue an unscoped request.
pub fn build_query_params(
    selected: Option<i64>,
    extra: &[(&str, Option<ParamValue>)],
) -> Option<QueryParams> {
    let mut params = BTreeMap::new();

    if let Some(id) = selected {
        params.insert(HEADQUARTER_PARAM.to_string(), id.to_string());
    }

    for (key, value) in extra {
        if let Some(value) = value {
            params.insert((*key).to_string(), value.to_string());
        }
    }

    if params.is_empty() {
        None
    } else {
        Some(QueryParams(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> Vec<Headquarter> {
        vec![Headquarter::new(1, "A1"), Headquarter::new(2, "B2")]
    }

    #[test]
    fn test_preference_parse() {
        assert_eq!(Preference::parse(None), Preference::Unset);
        assert_eq!(Preference::parse(Some("all")), Preference::All);
        assert_eq!(Preference::parse(Some("42")), Preference::One(42));
        assert_eq!(Preference::parse(Some("abc")), Preference::Unset);
        assert_eq!(Preference::parse(Some("")), Preference::Unset);
    }

    #[test]
    fn test_encode_selection() {
        assert_eq!(encode_selection(None), "all");
        assert_eq!(encode_selection(Some(3)), "3");
    }

    #[test]
    fn test_stored_id_present_is_kept() {
        assert_eq!(resolve_selection(Preference::One(2), &directory()), Some(2));
    }

    #[test]
    fn test_stale_id_falls_back_to_first() {
        assert_eq!(resolve_selection(Preference::One(99), &directory()), Some(1));
    }

    #[test]
    fn test_unset_selects_first_or_all_when_empty() {
        assert_eq!(resolve_selection(Preference::Unset, &directory()), Some(1));
        assert_eq!(resolve_selection(Preference::Unset, &[]), None);
        assert_eq!(resolve_selection(Preference::One(5), &[]), None);
    }

    #[test]
    fn test_all_is_kept() {
        assert_eq!(resolve_selection(Preference::All, &directory()), None);
    }

    #[test]
    fn test_params_none_when_nothing_to_send() {
        assert_eq!(build_query_params(None, &[]), None);
        assert_eq!(build_query_params(None, &[("foo", None)]), None);
    }

    #[test]
    fn test_params_with_selection() {
        let params = build_query_params(Some(3), &[]).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(HEADQUARTER_PARAM), Some("3"));
    }

    #[test]
    fn test_params_skip_absent_extras() {
        let params =
            build_query_params(Some(2), &[("foo", None), ("bar", Some(5.into()))]).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("headquarterId"), Some("2"));
        assert_eq!(params.get("bar"), Some("5"));
        assert!(!params.contains_key("foo"));
    }

    #[test]
    fn test_params_stringify_scalars() {
        let params = build_query_params(
            None,
            &[
                ("active", Some(true.into())),
                ("ratio", Some(0.5.into())),
                ("q", Some("ana".into())),
            ],
        )
        .unwrap();
        assert_eq!(params.get("active"), Some("true"));
        assert_eq!(params.get("ratio"), Some("0.5"));
        assert_eq!(params.get("q"), Some("ana"));
    }
}
