use std::str::FromStr;

use aceshub::{seed, Collection, DateTime, Facet, FacetKind, Map, Query, Record, Value, View};

fn mid_april() -> DateTime {
    DateTime::from_str("2025-04-14T12:00:00Z").unwrap()
}

fn names<'a>(records: &[&'a Record], field: &str) -> Vec<&'a str> {
    records.iter().map(|r| r.get_str(field).unwrap()).collect()
}

#[test]
fn python_finds_only_samantha() {
    let members = seed::members().unwrap();
    let query = Query::new().with_text("python").with_facet("year", "all");
    let result = seed::members_view().filter(&members, &query, mid_april());
    assert_eq!(names(&result, "name"), vec!["Samantha Lee"]);
}

#[test]
fn upcoming_events_keep_their_order() {
    let events = seed::events().unwrap();
    let query = Query::new().with_facet("when", "upcoming");
    let result = seed::events_view().filter(&events, &query, mid_april());
    assert_eq!(
        names(&result, "title"),
        vec![
            "Annual Hackathon 2025",
            "Tech Talk: AI in Education",
            "Resume Review Session",
        ]
    );
    let query = Query::new().with_facet("when", "past");
    let result = seed::events_view().filter(&events, &query, mid_april());
    assert_eq!(names(&result, "title"), vec!["Workshop: Frontend Development"]);
}

#[test]
fn pinned_announcements() {
    let announcements = seed::announcements().unwrap();
    let view = seed::announcements_view();
    let pinned = view.filter(
        &announcements,
        &Query::new().with_facet("pinned", "true"),
        mid_april(),
    );
    assert_eq!(
        pinned.iter().map(|r| r.id()).collect::<Vec<_>>(),
        vec![1, 2]
    );
    // The "career" tab over regular announcements.
    let career = view.filter(
        &announcements,
        &Query::new()
            .with_facet("pinned", "false")
            .with_facet("type", "career"),
        mid_april(),
    );
    assert_eq!(
        names(&career, "title"),
        vec!["Internship Opportunities at Tech Giants"]
    );
    // Searching within the body text.
    let healthcare = view.filter(
        &announcements,
        &Query::new().with_text("HEALTHCARE"),
        mid_april(),
    );
    assert_eq!(healthcare.len(), 1);
    assert_eq!(healthcare[0].id(), 4);
}

#[test]
fn committee_tab_with_year() {
    let members = seed::members().unwrap();
    let query = Query::new()
        .with_facet("group", "committee")
        .with_facet("year", "3rd Year");
    let result = seed::members_view().filter(&members, &query, mid_april());
    assert_eq!(names(&result, "name"), vec!["Samantha Lee", "Marcus Chen"]);
    let query = Query::new()
        .with_facet("group", "students")
        .with_facet("year", "3rd Year");
    let result = seed::members_view().filter(&members, &query, mid_april());
    assert_eq!(
        names(&result, "name"),
        vec!["Samantha Lee", "Marcus Chen", "Olivia Martinez"]
    );
}

// Soundness and completeness: a record is in the result exactly when it
// satisfies every predicate on its own.
#[test]
fn result_is_exactly_the_matching_records() {
    let members = seed::members().unwrap();
    let view = seed::members_view();
    let texts = ["", "a", "SEC", "react", "zzz", " Lee "];
    let years = ["all", "1st Year", "2nd Year", "3rd Year", "4th Year", "5th Year"];
    for text in texts {
        for year in years {
            let query = Query::new().with_text(text).with_facet("year", year);
            let result = view.filter(&members, &query, mid_april());
            for record in members.iter() {
                let needle = text.trim().to_lowercase();
                let year_ok = year == "all" || record.get_str("year") == Some(year);
                let text_ok = needle.is_empty()
                    || ["name", "skills"].iter().any(|f| {
                        record
                            .get(f)
                            .map(|v| v.contains_lowercase(&needle))
                            .unwrap_or(false)
                    });
                let included = result.iter().any(|r| r.id() == record.id());
                assert_eq!(
                    included,
                    year_ok && text_ok,
                    "text={:?} year={:?} id={}",
                    text,
                    year,
                    record.id()
                );
            }
            // Case-insensitivity and idempotence.
            let upper = Query::new()
                .with_text(text.to_uppercase())
                .with_facet("year", year);
            assert_eq!(view.filter(&members, &upper, mid_april()), result);
            let again = view.filter(result.iter().copied(), &query, mid_april());
            assert_eq!(again, result);
        }
    }
}

#[test]
fn custom_view_over_hand_built_records() {
    let record = |id: u64, title: &str, when: &str| {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::from(title));
        fields.insert("when".to_string(), Value::from(when));
        Record::new(id, fields)
    };
    let talks = Collection::new(
        "talks",
        vec![
            record(10, "Rust for Web", "2025-05-01"),
            record(3, "Intro to Git", "2025-03-01"),
            record(7, "Rust Async", "2025-06-01"),
        ],
    )
    .unwrap();
    let view = View::new(["title"]).with_facet(Facet::new("when", "when", FacetKind::Temporal));
    let query = Query::new().with_text("rust").with_facet("when", "upcoming");
    let result = view.filter(&talks, &query, mid_april());
    assert_eq!(result.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![10, 7]);
}
