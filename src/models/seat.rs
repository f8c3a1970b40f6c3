use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Database;

/// One row of `reserve` for a train.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatStatus {
    pub seat_id: String,
    pub reserved_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Available,
    Mine,
    Booked,
}

impl SeatState {
    /// CSS class next to `seat`. Only `available` seats are clickable.
    pub fn css_class(&self) -> &'static str {
        match self {
            SeatState::Available => crate::picker::AVAILABLE_CLASS,
            SeatState::Mine => "mine",
            SeatState::Booked => "booked",
        }
    }
}

impl SeatStatus {
    pub fn state_for(&self, me: &str) -> SeatState {
        match self.reserved_by.as_deref() {
            None => SeatState::Available,
            Some(owner) if owner == me => SeatState::Mine,
            Some(_) => SeatState::Booked,
        }
    }
}

/// A seat id like `10C`: numeric row followed by a column letter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeatCode {
    pub row: u32,
    pub column: String,
}

impl SeatCode {
    pub fn parse(seat_id: &str) -> Option<Self> {
        let split = seat_id.find(|c: char| !c.is_ascii_digit())?;
        let (row, column) = seat_id.split_at(split);
        let row = row.parse().ok()?;
        if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(SeatCode {
            row,
            column: column.to_string(),
        })
    }
}

/// Groups seats by row, rows ascending and columns alphabetical. Ids that do
/// not parse go into a trailing row 0 group.
pub fn seat_rows(seats: &[SeatStatus]) -> Vec<(u32, Vec<&SeatStatus>)> {
    let mut sorted: Vec<(Option<SeatCode>, &SeatStatus)> = seats
        .iter()
        .map(|seat| (SeatCode::parse(&seat.seat_id), seat))
        .collect();
    sorted.sort_by(|(a, sa), (b, sb)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => sa.seat_id.cmp(&sb.seat_id),
    });

    let mut rows: Vec<(u32, Vec<&SeatStatus>)> = Vec::new();
    for (code, seat) in sorted {
        let row = code.map(|c| c.row).unwrap_or(0);
        match rows.last_mut() {
            Some((current, group)) if *current == row => group.push(seat),
            _ => rows.push((row, vec![seat])),
        }
    }
    rows
}

impl SeatStatus {
    pub async fn load_for_train(train_id: &str, db: &Database) -> Result<Vec<SeatStatus>, sqlx::Error> {
        sqlx::query_as::<_, SeatStatus>(
            "SELECT seat_id, reserved_by FROM reserve WHERE train_id = $1",
        )
        .bind(train_id)
        .fetch_all(&db.pool)
        .await
    }

    /// `None` when the seat does not exist on this train.
    pub async fn find(
        train_id: &str,
        seat_id: &str,
        db: &Database,
    ) -> Result<Option<SeatStatus>, sqlx::Error> {
        sqlx::query_as::<_, SeatStatus>(
            "SELECT seat_id, reserved_by FROM reserve WHERE train_id = $1 AND seat_id = $2",
        )
        .bind(train_id)
        .bind(seat_id)
        .fetch_optional(&db.pool)
        .await
    }

    /// Books the seat if it is still free. Returns whether this call won it.
    pub async fn reserve(
        train_id: &str,
        seat_id: &str,
        user_id: &str,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE reserve
               SET is_reserved = TRUE,
                   reserved_by = $1,
                   reserved_at = NOW()
             WHERE seat_id = $2
               AND train_id = $3
               AND reserved_by IS NULL
            "#,
        )
        .bind(user_id)
        .bind(seat_id)
        .bind(train_id)
        .execute(&db.pool)
        .await
        .map(|r| r.rows_affected() > 0)
    }
}
