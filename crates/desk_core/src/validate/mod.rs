use crate::domain::NewTicket;
use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 200;

/// Surrounding whitespace in title/description is not significant and is
/// stripped before persistence.
pub fn normalize_new_ticket(draft: &NewTicket) -> NewTicket {
    NewTicket {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category: draft.category,
        priority: draft.priority,
    }
}

/// Local validation, run before any collaborator call. Errors are
/// user-facing and block submission.
pub fn validate_new_ticket(draft: &NewTicket) -> Result<(), AppError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(
            AppError::new("VALIDATION_EMPTY_TITLE", "Title cannot be empty.")
                .with_user_facing(true),
        );
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::new(
            "VALIDATION_TITLE_TOO_LONG",
            format!("Title cannot exceed {TITLE_MAX_CHARS} characters."),
        )
        .with_user_facing(true));
    }
    if draft.description.trim().is_empty() {
        return Err(AppError::new(
            "VALIDATION_EMPTY_DESCRIPTION",
            "Description cannot be empty.",
        )
        .with_user_facing(true));
    }
    Ok(())
}
