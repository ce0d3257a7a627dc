use rusqlite::types::Type;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, NewTicket, Priority, Status, Ticket, TicketFilter};
use crate::error::AppError;
use crate::validate::{normalize_new_ticket, validate_new_ticket};

const TICKET_COLUMNS: &str = "id, title, description, category, priority, status, created_at";

/// Partial update of the operator-editable fields. Absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketPatch {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

fn bad_column(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ticket> {
    let category: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let status: String = row.get(5)?;
    Ok(Ticket {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: Category::parse(&category).map_err(|e| bad_column(3, e))?,
        priority: Priority::parse(&priority).map_err(|e| bad_column(4, e))?,
        status: Status::parse(&status).map_err(|e| bad_column(5, e))?,
        created_at: row.get(6)?,
    })
}

// LIKE wildcards in user input must match literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// List tickets matching the filter, most recent first.
///
/// Absent (or blank-search) criteria do not narrow the result set. The
/// ordering is total (`created_at DESC, id DESC`) so identical calls with no
/// intervening mutation return identical sequences.
pub fn list_tickets(conn: &Connection, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError> {
    let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(category) = filter.category {
        params.push(category.as_str().to_string());
        clauses.push(format!("category = ?{}", params.len()));
    }
    if let Some(priority) = filter.priority {
        params.push(priority.as_str().to_string());
        clauses.push(format!("priority = ?{}", params.len()));
    }
    if let Some(status) = filter.status {
        params.push(status.as_str().to_string());
        clauses.push(format!("status = ?{}", params.len()));
    }
    if let Some(term) = filter.search_term() {
        let pattern = format!("%{}%", escape_like(term));
        params.push(pattern.clone());
        let title_param = params.len();
        params.push(pattern);
        let description_param = params.len();
        clauses.push(format!(
            "(title LIKE ?{title_param} ESCAPE '\\' OR description LIKE ?{description_param} ESCAPE '\\')"
        ));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut stmt = conn.prepare(&sql).map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to prepare tickets query")
            .with_details(e.to_string())
    })?;

    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), ticket_from_row)
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query tickets").with_details(e.to_string())
        })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to decode ticket row")
                .with_details(e.to_string())
        })?);
    }

    Ok(out)
}

pub fn get_ticket(conn: &Connection, id: i64) -> Result<Ticket, AppError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"
        ))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare ticket query")
                .with_details(e.to_string())
        })?;

    stmt.query_row([id], ticket_from_row)
        .map_err(|e| AppError::new("DB_NOT_FOUND", "Ticket not found").with_details(e.to_string()))
}

pub fn count_tickets(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to count tickets")
                .with_details(e.to_string())
        })
}

/// Validate, normalize and insert a draft. New tickets always start `open`;
/// `created_at` is supplied by the caller so the store stays deterministic
/// under test.
pub fn create_ticket(
    conn: &Connection,
    draft: &NewTicket,
    created_at: &str,
) -> Result<Ticket, AppError> {
    validate_new_ticket(draft)?;
    let draft = normalize_new_ticket(draft);

    conn.execute(
        "INSERT INTO tickets (title, description, category, priority, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            draft.title,
            draft.description,
            draft.category.as_str(),
            draft.priority.as_str(),
            Status::Open.as_str(),
            created_at,
        ],
    )
    .map_err(|e| {
        AppError::new("DB_INSERT_FAILED", "Failed to create ticket").with_details(e.to_string())
    })?;

    get_ticket(conn, conn.last_insert_rowid())
}

/// Apply a partial update and return the stored row. `title`, `description`
/// and `created_at` are immutable after creation.
pub fn update_ticket(conn: &Connection, id: i64, patch: &TicketPatch) -> Result<Ticket, AppError> {
    let changed = conn
        .execute(
            "UPDATE tickets SET
               category = COALESCE(?1, category),
               priority = COALESCE(?2, priority),
               status   = COALESCE(?3, status)
             WHERE id = ?4",
            rusqlite::params![
                patch.category.map(Category::as_str),
                patch.priority.map(Priority::as_str),
                patch.status.map(Status::as_str),
                id,
            ],
        )
        .map_err(|e| {
            AppError::new("DB_UPDATE_FAILED", "Failed to update ticket")
                .with_details(e.to_string())
        })?;

    if changed == 0 {
        return Err(
            AppError::new("DB_NOT_FOUND", "Ticket not found").with_details(format!("id={id}"))
        );
    }

    get_ticket(conn, id)
}

pub fn update_status(conn: &Connection, id: i64, status: Status) -> Result<Ticket, AppError> {
    update_ticket(
        conn,
        id,
        &TicketPatch {
            status: Some(status),
            ..TicketPatch::default()
        },
    )
}
