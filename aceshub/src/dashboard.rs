//! Dashboard summary statistics.

use serde::Serialize;

use crate::{seed, DateTime, FacetKind, Hub, Query, Record};

/// How many announcements the dashboard lists.
pub const LATEST_ANNOUNCEMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub title: String,
    pub date: DateTime,
    pub location: String,
    pub registered: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementSummary {
    pub title: String,
    pub date: DateTime,
    /// Relative to the time at which the summary was computed, e.g.
    /// `3 days ago`.
    pub age: String,
}

/// The numbers shown at the top of the dashboard.
///
/// Collections that aren't loaded count as empty. Facets are found through
/// each collection's view by kind rather than by name: upcoming events use
/// the events view's first temporal facet, pinned announcements the
/// announcements view's first flag facet, and committee members are those
/// selected by `committee` on the members view's first tag facet. A view
/// without such a facet counts zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_members: usize,
    pub committee_members: usize,
    pub upcoming_events: usize,
    pub next_event: Option<EventSummary>,
    pub announcements: usize,
    pub pinned_announcements: usize,
    pub budget_percent_spent: Option<i64>,
    pub latest_announcements: Vec<AnnouncementSummary>,
}

impl Summary {
    pub fn compute(hub: &Hub, now: DateTime) -> Self {
        let count = |name: &str, query: &Query| {
            hub.filter(name, query, now)
                .map(|records| records.len())
                .unwrap_or(0)
        };
        let facet = |name: &str, kind: FacetKind| {
            hub.view(name)
                .ok()
                .and_then(|view| view.facet_of_kind(kind))
        };
        let count_selected = |name: &str, kind: FacetKind, selection: &str| {
            facet(name, kind)
                .map(|f| count(name, &Query::new().with_facet(&f.name, selection)))
                .unwrap_or(0)
        };

        let (upcoming, date_field) = match facet(seed::EVENTS, FacetKind::Temporal) {
            Some(when) => (
                hub.filter(
                    seed::EVENTS,
                    &Query::new().with_facet(&when.name, "upcoming"),
                    now,
                )
                .unwrap_or_default(),
                when.field.as_str(),
            ),
            None => (Vec::new(), "date"),
        };
        let next_event = upcoming
            .iter()
            .filter_map(|r| {
                r.get(date_field)
                    .and_then(|d| d.as_date_time())
                    .map(|d| (d, *r))
            })
            .min_by_key(|(d, _)| *d)
            .map(|(date, r)| EventSummary {
                title: string_field(r, "title"),
                date,
                location: string_field(r, "location"),
                registered: r.get("registered").and_then(|v| v.as_unsigned()).unwrap_or(0),
            });

        let mut dated_announcements = hub
            .collection(seed::ANNOUNCEMENTS)
            .map(|c| {
                c.iter()
                    .filter_map(|r| r.get("date").and_then(|d| d.as_date_time()).map(|d| (d, r)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        // Newest first; stable, so ties keep their original order.
        dated_announcements.sort_by(|(a, _), (b, _)| b.cmp(a));
        let latest_announcements = dated_announcements
            .into_iter()
            .take(LATEST_ANNOUNCEMENTS)
            .map(|(date, r)| AnnouncementSummary {
                title: string_field(r, "title"),
                date,
                age: relative_age(date, now),
            })
            .collect();

        Self {
            total_members: count(seed::MEMBERS, &Query::new()),
            committee_members: count_selected(seed::MEMBERS, FacetKind::Tag, "committee"),
            upcoming_events: upcoming.len(),
            next_event,
            announcements: count(seed::ANNOUNCEMENTS, &Query::new()),
            pinned_announcements: count_selected(seed::ANNOUNCEMENTS, FacetKind::Flag, "true"),
            budget_percent_spent: hub.budget().map(|b| b.percent_spent()),
            latest_announcements,
        }
    }
}

fn string_field(record: &Record, field: &str) -> String {
    record.get_str(field).unwrap_or_default().to_string()
}

/// Describes how long ago `then` was, relative to `now`, e.g. `5 days ago`.
/// Times in the future are treated as `just now`.
pub fn relative_age(then: DateTime, now: DateTime) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;

    let secs = now.seconds_since(&then);
    let (n, unit) = if secs < MINUTE {
        return "just now".to_string();
    } else if secs < HOUR {
        (secs / MINUTE, "minute")
    } else if secs < DAY {
        (secs / HOUR, "hour")
    } else if secs < WEEK {
        (secs / DAY, "day")
    } else {
        (secs / WEEK, "week")
    };
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;
    use crate::{Facet, View};

    fn at(s: &str) -> DateTime {
        DateTime::from_str(s).unwrap()
    }

    #[test]
    fn relative_ages() {
        let now = at("2025-04-09T14:30:00Z");
        assert_eq!(relative_age(at("2025-04-09T14:29:30Z"), now), "just now");
        assert_eq!(relative_age(at("2025-04-10T00:00:00Z"), now), "just now");
        assert_eq!(relative_age(at("2025-04-09T14:29:00Z"), now), "1 minute ago");
        assert_eq!(relative_age(at("2025-04-09T12:00:00Z"), now), "2 hours ago");
        assert_eq!(relative_age(at("2025-04-06T14:30:00Z"), now), "3 days ago");
        assert_eq!(relative_age(at("2025-04-02T14:30:00Z"), now), "1 week ago");
        assert_eq!(relative_age(at("2025-03-19T14:30:00Z"), now), "3 weeks ago");
    }

    #[test]
    fn seeded_summary_mid_april() {
        let hub = Hub::seeded().unwrap();
        let summary = Summary::compute(&hub, at("2025-04-14T12:00:00Z"));
        assert_eq!(summary.total_members, 8);
        assert_eq!(summary.committee_members, 4);
        assert_eq!(summary.upcoming_events, 3);
        let next = summary.next_event.unwrap();
        assert_eq!(next.title, "Tech Talk: AI in Education");
        assert_eq!(next.location, "Room 202");
        assert_eq!(next.registered, 42);
        assert_eq!(summary.announcements, 4);
        assert_eq!(summary.pinned_announcements, 2);
        assert_eq!(summary.budget_percent_spent, Some(61));
        let latest = summary
            .latest_announcements
            .iter()
            .map(|a| (a.title.as_str(), a.age.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            latest,
            vec![
                ("Election Results Announced", "1 week ago"),
                ("Registration Open for Annual Hackathon", "1 week ago"),
                ("Internship Opportunities at Tech Giants", "1 week ago"),
            ]
        );
    }

    #[test]
    fn empty_hub_summary() {
        let summary = Summary::compute(&Hub::empty(), DateTime::now());
        assert_eq!(summary.total_members, 0);
        assert!(summary.next_event.is_none());
        assert!(summary.latest_announcements.is_empty());
        assert_eq!(summary.budget_percent_spent, None);
    }

    #[test]
    fn facets_are_found_by_kind() {
        let mut hub = Hub::empty();
        let events_view = View::new(["title"])
            .with_facet(Facet::new("status", "date", FacetKind::Temporal));
        hub.register(seed::events().unwrap(), events_view, "{{title}}", "")
            .unwrap();
        let announcements_view = View::new(["title"])
            .with_facet(Facet::new("sticky", "pinned", FacetKind::Flag));
        hub.register(seed::announcements().unwrap(), announcements_view, "{{title}}", "")
            .unwrap();
        // No tag facet, so no way to single out the committee.
        hub.register(seed::members().unwrap(), View::new(["name"]), "{{name}}", "")
            .unwrap();

        let summary = Summary::compute(&hub, at("2025-04-14T12:00:00Z"));
        assert_eq!(summary.upcoming_events, 3);
        assert_eq!(summary.next_event.unwrap().title, "Tech Talk: AI in Education");
        assert_eq!(summary.pinned_announcements, 2);
        assert_eq!(summary.total_members, 8);
        assert_eq!(summary.committee_members, 0);
    }
}
