//! The collaborator contracts are shape-sensitive: enum values travel as
//! snake_case strings and breakdown maps use enum-string keys.

use desk_core::domain::{
    Category, ClassificationSuggestion, Priority, Status, Ticket, TicketFilter,
};
use pretty_assertions::assert_eq;

#[test]
fn ticket_serializes_with_snake_case_enum_values() {
    let ticket = Ticket {
        id: 42,
        title: "Cannot log in".to_string(),
        description: "Password reset link expired".to_string(),
        category: Category::Account,
        priority: Priority::High,
        status: Status::InProgress,
        created_at: "2026-04-01T10:00:00Z".to_string(),
    };

    let v = serde_json::to_value(&ticket).expect("serialize");
    assert_eq!(v["id"], 42);
    assert_eq!(v["category"], "account");
    assert_eq!(v["priority"], "high");
    assert_eq!(v["status"], "in_progress");
    assert_eq!(v["created_at"], "2026-04-01T10:00:00Z");
}

#[test]
fn suggestion_deserializes_from_the_classify_response_shape() {
    let s: ClassificationSuggestion = serde_json::from_str(
        r#"{"suggested_category":"billing","suggested_priority":"critical"}"#,
    )
    .expect("deserialize");

    assert_eq!(s.suggested_category, Category::Billing);
    assert_eq!(s.suggested_priority, Priority::Critical);
}

#[test]
fn filter_round_trips_with_absent_criteria_omitted_as_null() {
    let filter = TicketFilter {
        status: Some(Status::Open),
        search: Some("refund".to_string()),
        ..TicketFilter::default()
    };

    let v = serde_json::to_value(&filter).expect("serialize");
    assert_eq!(v["status"], "open");
    assert_eq!(v["search"], "refund");
    assert!(v["category"].is_null());

    let back: TicketFilter = serde_json::from_value(v).expect("deserialize");
    assert_eq!(back, filter);
}

#[test]
fn breakdown_maps_use_enum_string_keys() {
    let mut conn = desk_core::db::open_in_memory().expect("open");
    desk_core::db::migrate(&mut conn).expect("migrate");
    desk_core::demo::seed_demo_tickets(&conn).expect("seed");

    let now = time::OffsetDateTime::parse(
        "2026-04-01T00:00:00Z",
        &time::format_description::well_known::Rfc3339,
    )
    .expect("timestamp");
    let snap = desk_core::stats::build_stats_snapshot(&conn, now).expect("stats");

    let v = serde_json::to_value(&snap).expect("serialize");
    assert_eq!(v["priority_breakdown"]["low"], 6);
    assert_eq!(v["category_breakdown"]["technical"], 6);
    assert!(v["category_breakdown"]["general"].is_number());
}
