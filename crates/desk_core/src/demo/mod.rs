use rusqlite::Connection;

use crate::domain::{Category, NewTicket, Priority, Status};
use crate::error::AppError;
use crate::repo::{create_ticket, update_status};

/// Seed a deterministic dataset large enough to make the stats view and the
/// list filters meaningful. Cycles through every category, priority and
/// status; two tickets per day starting 2026-03-01.
pub fn seed_demo_tickets(conn: &Connection) -> Result<i64, AppError> {
    let mut created = 0i64;

    for i in 1..=24usize {
        let day = 1 + (i - 1) / 2;
        let hour = ((i - 1) % 2) * 8;
        let created_at = format!("2026-03-{day:02}T{hour:02}:00:00Z");

        let draft = NewTicket {
            title: format!("Demo ticket {i}"),
            description: format!("Deterministic demo ticket number {i}"),
            category: Category::ALL[(i - 1) % Category::ALL.len()],
            priority: Priority::ALL[(i - 1) % Priority::ALL.len()],
        };

        let ticket = create_ticket(conn, &draft, &created_at)?;

        let status = Status::ALL[(i - 1) % Status::ALL.len()];
        if status != Status::Open {
            update_status(conn, ticket.id, status)?;
        }
        created += 1;
    }

    Ok(created)
}
