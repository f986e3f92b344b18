//! Filterable list views.

use std::str::FromStr;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{DateTime, Error, Query, Record, Value};

/// How a facet's selection is compared against a record's field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetKind {
    /// The field's textual value must equal the selection exactly.
    Exact,
    /// Case-insensitive equality with the field, or with any of its elements
    /// if the field is an array.
    Tag,
    /// Boolean partition. Accepts `true`/`false` or `yes`/`no`.
    Flag,
    /// Partitions records into `upcoming` (field is after "now") and `past`
    /// (field is at or before "now").
    Temporal,
}

impl FromStr for FacetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "exact" => Self::Exact,
            "tag" => Self::Tag,
            "flag" => Self::Flag,
            "temporal" => Self::Temporal,
            _ => return Err(Error::UnknownFacetKind(s.to_string())),
        })
    }
}

/// A categorical filter dimension on a particular record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    /// Field path (see [`Record::get`]).
    pub field: String,
    pub kind: FacetKind,
}

impl Facet {
    pub fn new<N, F>(name: N, field: F, kind: FacetKind) -> Self
    where
        N: AsRef<str>,
        F: AsRef<str>,
    {
        Self {
            name: name.as_ref().to_string(),
            field: field.as_ref().to_string(),
            kind,
        }
    }

    /// Whether the given record satisfies this facet for the given selection.
    ///
    /// Selections that make no sense for this kind of facet, and records
    /// whose field is missing or of the wrong type, never match.
    pub fn matches(&self, record: &Record, selection: &str, now: DateTime) -> bool {
        let value = match record.get(&self.field) {
            Some(v) => v,
            None => return false,
        };
        let selection = selection.trim();
        match self.kind {
            FacetKind::Exact => any_scalar(value, |s| s == selection),
            FacetKind::Tag => any_scalar(value, |s| s.to_lowercase() == selection.to_lowercase()),
            FacetKind::Flag => match (parse_flag(selection), value.as_bool()) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => false,
            },
            FacetKind::Temporal => match value.as_date_time() {
                Some(when) => match selection.to_lowercase().as_str() {
                    "upcoming" => when > now,
                    "past" => when <= now,
                    _ => false,
                },
                None => false,
            },
        }
    }
}

fn any_scalar<F: Fn(&str) -> bool>(value: &Value, pred: F) -> bool {
    match value {
        Value::Array(arr) => arr
            .iter()
            .filter_map(Value::display_string)
            .any(|s| pred(&s)),
        _ => value.display_string().map(|s| pred(&s)).unwrap_or(false),
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// A view defines how a collection can be searched and narrowed down prior to
/// being rendered: which fields free-text search looks at, and which facets
/// are on offer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct View {
    #[serde(default)]
    pub text_fields: Vec<String>,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl View {
    /// Constructor.
    pub fn new<I, S>(text_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            text_fields: text_fields
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            facets: Vec::new(),
        }
    }

    /// Convenience method for adding a facet to this view.
    pub fn with_facet(mut self, facet: Facet) -> Self {
        self.facets.push(facet);
        self
    }

    /// Get the facet with the given name, if this view has one.
    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    /// The first facet of the given kind, if any.
    pub fn facet_of_kind(&self, kind: FacetKind) -> Option<&Facet> {
        self.facets.iter().find(|f| f.kind == kind)
    }

    /// Returns the records that match the given query, in their original
    /// order.
    ///
    /// A record matches when every active facet selection holds for it and,
    /// if the trimmed query text is non-empty, at least one of the view's text
    /// fields contains the text (ignoring case). A selection for a facet this
    /// view doesn't define matches nothing. `now` is the reference point for
    /// temporal facets.
    pub fn filter<'a, I>(&self, records: I, query: &Query, now: DateTime) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let needle = query.text().trim().to_lowercase();
        let active = query
            .active_facets()
            .map(|(name, selection)| (name, self.facet(name), selection))
            .collect::<Vec<_>>();
        for (name, facet, selection) in &active {
            if facet.is_none() {
                trace!("No such facet \"{}\" (selected \"{}\")", name, selection);
            }
        }
        records
            .into_iter()
            .filter(|record| {
                active.iter().all(|(_, facet, selection)| match facet {
                    Some(facet) => facet.matches(record, selection, now),
                    None => false,
                }) && self.matches_text(record, &needle)
            })
            .collect()
    }

    // `needle` must be trimmed and lowercase.
    fn matches_text(&self, record: &Record, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.text_fields.iter().any(|field| {
            record
                .get(field)
                .map(|v| v.contains_lowercase(needle))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Collection, SupportedFormat};

    const PEOPLE: &str = r#"
- id: 1
  name: Alex Johnson
  year: 4th Year
  groups: [committee, students]
  skills: [React, Node.js, MongoDB]
  pinned: true
  joined: 2025-04-01T10:00:00
- id: 2
  name: Samantha Lee
  year: 3rd Year
  groups: [committee, students]
  skills: [Python, Machine Learning, AWS]
  pinned: false
  joined: 2025-04-20T10:00:00
- id: 3
  name: David Wilson
  year: 2nd Year
  groups: [students]
  skills: [C++, Data Structures, Algorithms]
  pinned: true
  joined: 2025-04-10T10:00:00
- id: 4
  name: Olivia Martinez
  year: 3rd Year
  groups: [students]
  skills: [Cybersecurity]
"#;

    fn people() -> Collection {
        Collection::from_value(
            "people",
            Value::load_as(SupportedFormat::Yaml, PEOPLE).unwrap(),
        )
        .unwrap()
    }

    fn view() -> View {
        View::new(["name", "skills"])
            .with_facet(Facet::new("year", "year", FacetKind::Exact))
            .with_facet(Facet::new("group", "groups", FacetKind::Tag))
            .with_facet(Facet::new("pinned", "pinned", FacetKind::Flag))
            .with_facet(Facet::new("when", "joined", FacetKind::Temporal))
    }

    fn now() -> DateTime {
        DateTime::from_str("2025-04-10T10:00:00Z").unwrap()
    }

    fn ids(records: &[&Record]) -> Vec<u64> {
        records.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let people = people();
        let query = Query::new()
            .with_facet("year", "all")
            .with_facet("group", "ALL");
        assert_eq!(ids(&view().filter(&people, &query, now())), vec![1, 2, 3, 4]);
        let query = Query::new().with_text("   ");
        assert_eq!(ids(&view().filter(&people, &query, now())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn text_matches_any_text_field_ignoring_case() {
        let people = people();
        let v = view();
        for text in ["python", "PYTHON", "Python", "  pyth "] {
            let query = Query::new().with_text(text);
            assert_eq!(ids(&v.filter(&people, &query, now())), vec![2], "{}", text);
        }
        let query = Query::new().with_text("son");
        assert_eq!(ids(&v.filter(&people, &query, now())), vec![1, 3]);
        // Only designated fields are searched.
        let query = Query::new().with_text("3rd");
        assert!(v.filter(&people, &query, now()).is_empty());
    }

    #[test]
    fn facets_combine_with_text() {
        let people = people();
        let query = Query::new()
            .with_facet("year", "3rd Year")
            .with_text("a");
        assert_eq!(ids(&view().filter(&people, &query, now())), vec![2, 4]);
        let query = Query::new()
            .with_facet("year", "3rd Year")
            .with_facet("group", "Committee");
        assert_eq!(ids(&view().filter(&people, &query, now())), vec![2]);
    }

    #[test]
    fn exact_facets_are_case_sensitive() {
        let query = Query::new().with_facet("year", "3rd year");
        assert!(view().filter(&people(), &query, now()).is_empty());
    }

    #[test]
    fn flag_facet_partitions_records() {
        let people = people();
        let pinned = Query::new().with_facet("pinned", "true");
        let unpinned = Query::new().with_facet("pinned", "no");
        assert_eq!(ids(&view().filter(&people, &pinned, now())), vec![1, 3]);
        // Record 4 has no pinned field, so it's in neither partition.
        assert_eq!(ids(&view().filter(&people, &unpinned, now())), vec![2]);
    }

    #[test]
    fn temporal_facet_compares_against_now() {
        let people = people();
        let upcoming = Query::new().with_facet("when", "upcoming");
        let past = Query::new().with_facet("when", "Past");
        assert_eq!(ids(&view().filter(&people, &upcoming, now())), vec![2]);
        // Exactly "now" counts as past.
        assert_eq!(ids(&view().filter(&people, &past, now())), vec![1, 3]);
    }

    #[test]
    fn invalid_selections_match_nothing() {
        let people = people();
        for (name, value) in [
            ("pinned", "maybe"),
            ("when", "tomorrow"),
            ("year", "5th Year"),
            ("colour", "blue"),
        ] {
            let query = Query::new().with_facet(name, value);
            assert!(
                view().filter(&people, &query, now()).is_empty(),
                "{}={}",
                name,
                value
            );
        }
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let people = people();
        let v = view();
        let query = Query::new().with_text("a").with_facet("group", "students");
        let once = v.filter(&people, &query, now());
        let twice = v.filter(once.iter().copied(), &query, now());
        assert_eq!(once, twice);
        let positions = once
            .iter()
            .map(|r| people.iter().position(|p| p.id() == r.id()).unwrap())
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let records: Vec<Record> = Vec::new();
        let query = Query::new().with_text("anything");
        assert!(view().filter(&records, &query, now()).is_empty());
    }

    #[test]
    fn facet_kind_parsing() {
        assert_eq!(FacetKind::from_str("Temporal").unwrap(), FacetKind::Temporal);
        assert!(matches!(
            FacetKind::from_str("range"),
            Err(Error::UnknownFacetKind(_))
        ));
    }

    #[test]
    fn facets_by_kind() {
        let view = view();
        assert_eq!(view.facet_of_kind(FacetKind::Flag).unwrap().name, "pinned");
        assert_eq!(view.facet_of_kind(FacetKind::Tag).unwrap().field, "groups");
        let plain = View::new(["name"]).with_facet(Facet::new("year", "year", FacetKind::Exact));
        assert!(plain.facet_of_kind(FacetKind::Temporal).is_none());
    }
}
