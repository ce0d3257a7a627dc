use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Canonical ticket representation.
///
/// Notes:
/// - `category`, `priority` and `status` are closed enumerations; free text
///   never reaches these fields, even when a value originates from an AI
///   suggestion.
/// - `created_at` is an RFC3339 UTC string assigned once at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: String,
}

/// Field values for a ticket that does not exist yet. The store assigns
/// `id`, `status` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

/// Advisor output for a draft description. Ephemeral: lives only while the
/// draft is being composed and is discarded on submit or reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationSuggestion {
    pub suggested_category: Category,
    pub suggested_priority: Priority,
}

/// Query criteria for listing tickets. An absent criterion never narrows the
/// result set, and a blank `search` is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub search: Option<String>,
}

impl TicketFilter {
    /// The effective search term: trimmed, `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        match self.search.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(term) => Some(term),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Technical,
    Account,
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "billing" => Ok(Category::Billing),
            "technical" => Ok(Category::Technical),
            "account" => Ok(Category::Account),
            "general" => Ok(Category::General),
            other => Err(AppError::new("DOMAIN_BAD_CATEGORY", "Unknown ticket category")
                .with_details(format!("value={other}"))),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(AppError::new("DOMAIN_BAD_PRIORITY", "Unknown ticket priority")
                .with_details(format!("value={other}"))),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "open" => Ok(Status::Open),
            "in_progress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "closed" => Ok(Status::Closed),
            other => Err(AppError::new("DOMAIN_BAD_STATUS", "Unknown ticket status")
                .with_details(format!("value={other}"))),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Open
    }
}
