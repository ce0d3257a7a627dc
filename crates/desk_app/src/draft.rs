use desk_core::domain::{Category, ClassificationSuggestion, NewTicket, Priority, Ticket};
use desk_core::error::AppError;
use desk_core::validate::validate_new_ticket;

use crate::refresh::RefreshCoordinator;
use crate::service::TicketService;

/// Shown when the store fails without a usable message of its own.
const GENERIC_SUBMIT_ERROR: &str = "Failed to create ticket. Please try again.";

/// Where the draft currently is in its submission lifecycle. `Classifying`
/// covers the window between a classification request being issued and its
/// latest response being applied; submission is disabled for the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    Editing,
    Classifying,
}

/// One classification round trip. The token implements last-write-wins: a
/// response is applied only while its token is still the latest issued one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRequest {
    pub token: u64,
    pub description: String,
}

/// The in-progress submission: field values, advisory suggestion, override
/// semantics, validation, and the submit lifecycle.
#[derive(Debug)]
pub struct TicketDraft {
    title: String,
    description: String,
    category: Category,
    priority: Priority,
    suggestion: Option<ClassificationSuggestion>,
    auto_fill_eligible: bool,
    phase: DraftPhase,
    submit_error: Option<String>,
    classify_token: u64,
}

impl TicketDraft {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: Category::default(),
            priority: Priority::default(),
            suggestion: None,
            auto_fill_eligible: true,
            phase: DraftPhase::Editing,
            submit_error: None,
            classify_token: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The latest advisory suggestion, kept for display until the draft is
    /// submitted or reset.
    pub fn suggestion(&self) -> Option<&ClassificationSuggestion> {
        self.suggestion.as_ref()
    }

    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// The user-visible error from the last submit attempt, if any.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// A direct edit of category is an explicit override: from here on,
    /// suggestions are informational only and never auto-applied, until the
    /// draft is reset.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.auto_fill_eligible = false;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.auto_fill_eligible = false;
    }

    /// Called on loss of focus from the description field. Returns the
    /// request to hand to the classifier, or `None` when the description is
    /// blank (the advisor is never invoked for blank text).
    ///
    /// Reentrant: a second blur while a request is in flight issues a newer
    /// token, which makes the earlier response stale on arrival.
    pub fn begin_classification(&mut self) -> Option<ClassifyRequest> {
        let description = self.description.trim();
        if description.is_empty() {
            return None;
        }
        self.classify_token += 1;
        self.phase = DraftPhase::Classifying;
        Some(ClassifyRequest {
            token: self.classify_token,
            description: description.to_string(),
        })
    }

    /// Apply the outcome of a classification round trip.
    ///
    /// Responses carrying an out-of-date token are discarded outright.
    /// Advisor failures are swallowed: the draft keeps whatever
    /// category/priority it already has and the failure is only logged.
    pub fn apply_classification(
        &mut self,
        request: &ClassifyRequest,
        outcome: Result<ClassificationSuggestion, AppError>,
    ) {
        if request.token != self.classify_token {
            log::debug!(
                "discarding stale classification response (token {}, latest {})",
                request.token,
                self.classify_token
            );
            return;
        }
        self.phase = DraftPhase::Editing;

        match outcome {
            Ok(suggestion) => {
                if self.auto_fill_eligible {
                    self.category = suggestion.suggested_category;
                    self.priority = suggestion.suggested_priority;
                }
                self.suggestion = Some(suggestion);
            }
            Err(e) => {
                log::warn!("classification advisor unavailable: {e}");
            }
        }
    }

    /// Submission is disabled while a classification round trip is pending.
    pub fn can_submit(&self) -> bool {
        self.phase == DraftPhase::Editing
    }

    pub fn as_new_ticket(&self) -> NewTicket {
        NewTicket {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            priority: self.priority,
        }
    }

    /// Validate and submit the draft.
    ///
    /// Local validation failures never reach the store and leave the fields
    /// untouched. A store failure also preserves the fields so the user can
    /// retry, surfacing the store's message verbatim (or a generic fallback).
    /// Success resets the draft and signals the refresh coordinator.
    pub fn submit(
        &mut self,
        service: &dyn TicketService,
        refresh: &RefreshCoordinator,
    ) -> Result<Ticket, AppError> {
        if !self.can_submit() {
            return Err(AppError::new(
                "DRAFT_BUSY",
                "A classification request is still in flight",
            ));
        }

        let draft = self.as_new_ticket();
        if let Err(e) = validate_new_ticket(&draft) {
            self.submit_error = Some(e.message.clone());
            return Err(e);
        }

        match service.create(&draft) {
            Ok(ticket) => {
                self.reset();
                refresh.bump();
                Ok(ticket)
            }
            Err(e) => {
                self.submit_error = Some(if e.message.trim().is_empty() {
                    GENERIC_SUBMIT_ERROR.to_string()
                } else {
                    e.message.clone()
                });
                Err(e)
            }
        }
    }

    /// Return to the initial empty state. Auto-fill eligibility is restored
    /// and any in-flight classification response is invalidated.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.category = Category::default();
        self.priority = Priority::default();
        self.suggestion = None;
        self.auto_fill_eligible = true;
        self.phase = DraftPhase::Editing;
        self.submit_error = None;
        // A response issued against the pre-reset draft must arrive stale.
        self.classify_token += 1;
    }
}

impl Default for TicketDraft {
    fn default() -> Self {
        Self::new()
    }
}
