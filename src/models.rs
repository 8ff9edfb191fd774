use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account record owned by the store. The scoring engine only ever reads it;
/// mutations go through `MemoryStore` so they stay atomic.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub level: u8,
    pub points: i64,
    pub consecutive_weeks: i64,
    pub medals: Vec<String>,
    pub last_visit: Option<DateTime<Utc>>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            level: self.level,
            points: self.points,
            consecutive_weeks: self.consecutive_weeks,
            medals: self.medals.clone(),
            last_visit: self.last_visit,
        }
    }
}

/// `User` without the password hash, for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub level: u8,
    pub points: i64,
    pub consecutive_weeks: i64,
    pub medals: Vec<String>,
    pub last_visit: Option<DateTime<Utc>>,
}

/// A single attendance session. `duration_minutes` stays 0 while the session
/// is open; it becomes authoritative at checkout (floored whole minutes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub duration_minutes: i64,
}

/// Trainer confirmation for one check-in. At most one per check-in; a second
/// submission overwrites the flag instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub id: String,
    pub check_in_id: String,
    pub user_id: String,
    pub trainer_validated: bool,
    pub date: DateTime<Utc>,
}
