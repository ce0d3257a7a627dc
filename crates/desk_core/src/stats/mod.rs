use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Category, Priority, Status};
use crate::error::AppError;

/// Point-in-time aggregate view of the ticket corpus. The store owns the
/// aggregation; consumers only hold the most recently fetched snapshot.
///
/// Every enum value appears in its breakdown map, zero counts included, and
/// each breakdown sums to `total_tickets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub avg_tickets_per_day: f64,
    pub priority_breakdown: BTreeMap<Priority, i64>,
    pub category_breakdown: BTreeMap<Category, i64>,
}

fn count_where(conn: &Connection, sql: &str, params: &[&str]) -> Result<i64, AppError> {
    conn.query_row(sql, rusqlite::params_from_iter(params.iter()), |row| {
        row.get(0)
    })
    .map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to aggregate tickets").with_details(e.to_string())
    })
}

fn grouped_counts(conn: &Connection, column: &str) -> Result<Vec<(String, i64)>, AppError> {
    // `column` is a compile-time constant name, never user input.
    let sql = format!("SELECT {column}, COUNT(*) FROM tickets GROUP BY {column}");
    let mut stmt = conn.prepare(&sql).map_err(|e| {
        AppError::new("DB_QUERY_FAILED", "Failed to prepare breakdown query")
            .with_details(e.to_string())
    })?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query breakdown")
                .with_details(e.to_string())
        })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to decode breakdown row")
                .with_details(e.to_string())
        })?);
    }
    Ok(out)
}

fn earliest_created_at(conn: &Connection) -> Result<Option<OffsetDateTime>, AppError> {
    let first: Option<String> = conn
        .query_row("SELECT MIN(created_at) FROM tickets", [], |row| row.get(0))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to query earliest ticket")
                .with_details(e.to_string())
        })?;

    match first {
        None => Ok(None),
        Some(s) => OffsetDateTime::parse(&s, &Rfc3339).map(Some).map_err(|e| {
            AppError::new("STATS_TS_PARSE_FAILED", "Failed to parse earliest created_at")
                .with_details(format!("value={s}; err={e}"))
        }),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Build the aggregate snapshot using SQL-level aggregation. `now` is
/// injected so the tickets-per-day figure is deterministic under test.
///
/// Tickets per day divides the total by whole days elapsed since the earliest
/// `created_at`, floored at one day, rounded to one decimal. An empty store
/// yields 0.0.
pub fn build_stats_snapshot(conn: &Connection, now: OffsetDateTime) -> Result<StatsSnapshot, AppError> {
    let total_tickets = count_where(conn, "SELECT COUNT(*) FROM tickets", &[])?;
    let open_tickets = count_where(
        conn,
        "SELECT COUNT(*) FROM tickets WHERE status = ?1",
        &[Status::Open.as_str()],
    )?;

    let mut priority_breakdown: BTreeMap<Priority, i64> =
        Priority::ALL.iter().map(|p| (*p, 0)).collect();
    for (value, count) in grouped_counts(conn, "priority")? {
        let priority = Priority::parse(&value)?;
        priority_breakdown.insert(priority, count);
    }

    let mut category_breakdown: BTreeMap<Category, i64> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    for (value, count) in grouped_counts(conn, "category")? {
        let category = Category::parse(&value)?;
        category_breakdown.insert(category, count);
    }

    let avg_tickets_per_day = match earliest_created_at(conn)? {
        None => 0.0,
        Some(first) => {
            let mut days = (now - first).whole_days();
            if days < 1 {
                days = 1;
            }
            round1(total_tickets as f64 / days as f64)
        }
    };

    Ok(StatsSnapshot {
        total_tickets,
        open_tickets,
        avg_tickets_per_day,
        priority_breakdown,
        category_breakdown,
    })
}
