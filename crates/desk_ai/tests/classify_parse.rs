use desk_ai::classify::parse_classification;
use desk_core::domain::{Category, Priority};
use pretty_assertions::assert_eq;

#[test]
fn parses_a_bare_json_reply() {
    let s = parse_classification(r#"{"category": "account", "priority": "high"}"#)
        .expect("parse");
    assert_eq!(s.suggested_category, Category::Account);
    assert_eq!(s.suggested_priority, Priority::High);
}

#[test]
fn strips_a_markdown_code_fence() {
    let reply = "```json\n{\"category\": \"billing\", \"priority\": \"critical\"}\n```";
    let s = parse_classification(reply).expect("parse");
    assert_eq!(s.suggested_category, Category::Billing);
    assert_eq!(s.suggested_priority, Priority::Critical);
}

#[test]
fn unknown_category_falls_back_to_general() {
    let s = parse_classification(r#"{"category": "spam", "priority": "low"}"#).expect("parse");
    assert_eq!(s.suggested_category, Category::General);
    assert_eq!(s.suggested_priority, Priority::Low);
}

#[test]
fn unknown_priority_falls_back_to_medium() {
    let s = parse_classification(r#"{"category": "technical", "priority": "urgent"}"#)
        .expect("parse");
    assert_eq!(s.suggested_category, Category::Technical);
    assert_eq!(s.suggested_priority, Priority::Medium);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let s = parse_classification("{}").expect("parse");
    assert_eq!(s.suggested_category, Category::General);
    assert_eq!(s.suggested_priority, Priority::Medium);
}

#[test]
fn non_json_reply_is_an_error() {
    let err = parse_classification("I think this is a billing issue.").expect_err("reject prose");
    assert_eq!(err.code, "AI_CLASSIFY_BAD_REPLY");
}

#[test]
fn empty_reply_is_an_error() {
    let err = parse_classification("   ").expect_err("reject blank");
    assert_eq!(err.code, "AI_CLASSIFY_BAD_REPLY");
}
