use std::path::Path;

use rusqlite::Connection;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use desk_core::domain::{NewTicket, Status, Ticket, TicketFilter};
use desk_core::error::AppError;
use desk_core::repo;
use desk_core::stats::{build_stats_snapshot, StatsSnapshot};
use desk_core::{db, demo};

/// Persistence collaborator consumed by the controllers.
///
/// The contract mirrors the four store operations: list with filters, create
/// with validation, status update, aggregate snapshot.
pub trait TicketService {
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError>;
    fn create(&self, draft: &NewTicket) -> Result<Ticket, AppError>;
    fn update_status(&self, id: i64, status: Status) -> Result<Ticket, AppError>;
    fn stats(&self) -> Result<StatsSnapshot, AppError>;
}

/// SQLite-backed service. Owns the connection; the schema is migrated on
/// construction.
pub struct SqliteTicketService {
    conn: Connection,
}

impl SqliteTicketService {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let mut conn = db::open(path)?;
        db::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        let mut conn = db::open_in_memory()?;
        db::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn seed_demo_tickets(&self) -> Result<i64, AppError> {
        demo::seed_demo_tickets(&self.conn)
    }

    fn now_rfc3339() -> Result<String, AppError> {
        OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
            AppError::new("TIME_FORMAT_FAILED", "Failed to format current time")
                .with_details(e.to_string())
        })
    }
}

impl TicketService for SqliteTicketService {
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError> {
        repo::list_tickets(&self.conn, filter)
    }

    fn create(&self, draft: &NewTicket) -> Result<Ticket, AppError> {
        repo::create_ticket(&self.conn, draft, &Self::now_rfc3339()?)
    }

    fn update_status(&self, id: i64, status: Status) -> Result<Ticket, AppError> {
        repo::update_status(&self.conn, id, status)
    }

    fn stats(&self) -> Result<StatsSnapshot, AppError> {
        build_stats_snapshot(&self.conn, OffsetDateTime::now_utc())
    }
}
