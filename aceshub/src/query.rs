//! The user's current query: free text plus facet selections.

use crate::{Error, Map};

/// The facet selection value that places no constraint on the facet. Matched
/// case-insensitively.
pub const ALL: &str = "all";

/// Free-text search input plus zero or more facet selections.
///
/// Queries are cheap, short-lived values owned by whoever is displaying a
/// view. They are recomputed (and the view refiltered) on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    facets: Map<String, String>,
}

impl Query {
    /// A query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience method for constructing a query with the given search
    /// text.
    pub fn with_text<S: AsRef<str>>(mut self, text: S) -> Self {
        self.set_text(text);
        self
    }

    /// Convenience method for constructing a query with a facet selection.
    pub fn with_facet<N, V>(mut self, name: N, value: V) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.select(name, value);
        self
    }

    pub fn set_text<S: AsRef<str>>(&mut self, text: S) {
        self.text = text.as_ref().to_string();
    }

    /// Select a value for the named facet, returning the previous selection.
    pub fn select<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.facets
            .insert(name.as_ref().to_string(), value.as_ref().to_string())
    }

    /// The raw search text, as typed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current selection for the named facet, if any.
    pub fn selection<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.facets.get(name.as_ref()).map(String::as_str)
    }

    /// Facet selections that actually constrain the results, i.e. everything
    /// other than the [`ALL`] sentinel.
    pub fn active_facets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facets
            .iter()
            .filter(|(_, v)| !v.trim().eq_ignore_ascii_case(ALL))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses a facet selection of the form `name=value`.
    pub fn parse_facet_selection(s: &str) -> Result<(String, String), Error> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(Error::MalformedFacetSelection(s.to_string())),
        }
    }
}
