//! Built-in data for the dashboard pages, and the views each page uses to
//! filter it.

use crate::{Budget, Collection, Error, Facet, FacetKind, Source, SupportedFormat, View};

pub const MEMBERS: &str = "members";
pub const EVENTS: &str = "events";
pub const ANNOUNCEMENTS: &str = "announcements";
pub const TRANSACTIONS: &str = "transactions";

fn embedded(content: &'static str) -> Source {
    Source::Embedded {
        format: SupportedFormat::Yaml,
        content,
    }
}

pub fn members() -> Result<Collection, Error> {
    Collection::load(MEMBERS, &embedded(include_str!("../data/members.yaml")))
}

pub fn events() -> Result<Collection, Error> {
    Collection::load(EVENTS, &embedded(include_str!("../data/events.yaml")))
}

pub fn announcements() -> Result<Collection, Error> {
    Collection::load(
        ANNOUNCEMENTS,
        &embedded(include_str!("../data/announcements.yaml")),
    )
}

pub fn transactions() -> Result<Collection, Error> {
    Collection::load(
        TRANSACTIONS,
        &embedded(include_str!("../data/transactions.yaml")),
    )
}

pub fn budget() -> Result<Budget, Error> {
    SupportedFormat::Yaml.deserialize(include_str!("../data/budget.yaml"))
}

/// Search by name or skill; narrow down by group tab (`committee` or
/// `students`) and by year.
pub fn members_view() -> View {
    View::new(["name", "skills"])
        .with_facet(Facet::new("group", "groups", FacetKind::Tag))
        .with_facet(Facet::new("year", "year", FacetKind::Exact))
}

/// Search by title, description or location; split into upcoming and past
/// events.
pub fn events_view() -> View {
    View::new(["title", "description", "location"])
        .with_facet(Facet::new("when", "date", FacetKind::Temporal))
        .with_facet(Facet::new("type", "type", FacetKind::Tag))
}

/// Search by title or content; split into pinned and regular announcements
/// and by type tab.
pub fn announcements_view() -> View {
    View::new(["title", "content"])
        .with_facet(Facet::new("pinned", "pinned", FacetKind::Flag))
        .with_facet(Facet::new("type", "type", FacetKind::Tag))
}

pub fn transactions_view() -> View {
    View::new(["description", "category"])
        .with_facet(Facet::new("category", "category", FacetKind::Tag))
}
