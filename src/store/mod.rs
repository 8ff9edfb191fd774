use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::gamification::WeeklyDecision;
use crate::models::{CheckIn, User, Validation};

/// Read contract the scoring engine depends on. The engine never mutates;
/// everything it needs is a snapshot of these three queries.
pub trait GymStore: Send + Sync {
    fn find_user_by_id(&self, id: &str) -> Option<User>;

    /// Check-ins whose `check_in_time` falls inside `[start, end]`.
    fn check_ins_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<CheckIn>;

    /// Validations whose `date` falls inside `[start, end]`.
    fn validations_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Validation>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user not found")]
    UserNotFound,
    #[error("check-in not found")]
    CheckInNotFound,
    #[error("checkout already registered")]
    AlreadyCheckedOut,
    #[error("email already registered")]
    EmailTaken,
}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    check_ins: Vec<CheckIn>,
    validations: Vec<Validation>,
}

/// Process-memory stand-in for a persistence layer. Every mutation takes the
/// write lock exactly once, so checkout read-modify-write and validation
/// upsert cannot race into double-applies or duplicate records.
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }

    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner
            .users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::EmailTaken);
        }
        inner.users.push(user);
        Ok(())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn set_user_level(&self, user_id: &str, level: u8) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        let user = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(StoreError::UserNotFound)?;
        user.level = level;
        Ok(user.clone())
    }

    /// Opens a session and stamps the user's `last_visit` under one lock.
    pub fn create_check_in(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CheckIn, StoreError> {
        let mut inner = self.inner.write();
        let user = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(StoreError::UserNotFound)?;
        user.last_visit = Some(now);

        let check_in = CheckIn {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            check_in_time: now,
            check_out_time: None,
            duration_minutes: 0,
        };
        inner.check_ins.push(check_in.clone());
        Ok(check_in)
    }

    /// Closes a session exactly once. The "already closed" check happens
    /// under the same write lock as the mutation, so concurrent checkouts of
    /// one check-in cannot both succeed.
    pub fn close_check_in(
        &self,
        user_id: &str,
        check_in_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CheckIn, StoreError> {
        let mut inner = self.inner.write();
        let check_in = inner
            .check_ins
            .iter_mut()
            .find(|check_in| check_in.id == check_in_id && check_in.user_id == user_id)
            .ok_or(StoreError::CheckInNotFound)?;

        if check_in.check_out_time.is_some() {
            return Err(StoreError::AlreadyCheckedOut);
        }

        check_in.check_out_time = Some(now);
        check_in.duration_minutes = (now - check_in.check_in_time).num_minutes();
        Ok(check_in.clone())
    }

    /// Create-or-overwrite by check-in id: a second trainer submission
    /// updates the existing record's flag instead of adding a duplicate.
    /// Returns the record plus whether it was newly created.
    pub fn upsert_validation(
        &self,
        user_id: &str,
        check_in_id: &str,
        trainer_validated: bool,
        now: DateTime<Utc>,
    ) -> Result<(Validation, bool), StoreError> {
        let mut inner = self.inner.write();
        if !inner
            .check_ins
            .iter()
            .any(|check_in| check_in.id == check_in_id && check_in.user_id == user_id)
        {
            return Err(StoreError::CheckInNotFound);
        }

        if let Some(existing) = inner
            .validations
            .iter_mut()
            .find(|validation| validation.check_in_id == check_in_id)
        {
            existing.trainer_validated = trainer_validated;
            return Ok((existing.clone(), false));
        }

        let validation = Validation {
            id: Uuid::new_v4().to_string(),
            check_in_id: check_in_id.to_string(),
            user_id: user_id.to_string(),
            trainer_validated,
            date: now,
        };
        inner.validations.push(validation.clone());
        Ok((validation, true))
    }

    pub fn check_ins_for_user(&self, user_id: &str) -> Vec<CheckIn> {
        self.inner
            .read()
            .check_ins
            .iter()
            .filter(|check_in| check_in.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn validations_for_user(&self, user_id: &str) -> Vec<Validation> {
        self.inner
            .read()
            .validations
            .iter()
            .filter(|validation| validation.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Persists a current-week decision onto the user in one step: net point
    /// change, new streak value, and the medal append (idempotent — an
    /// already-held medal is never duplicated).
    pub fn apply_week_decision(
        &self,
        user_id: &str,
        decision: &WeeklyDecision,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        let user = inner
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(StoreError::UserNotFound)?;

        user.points += decision.net_points_change;
        user.consecutive_weeks = decision.consecutive_weeks;
        if let Some(medal) = &decision.medal_earned {
            if !user.medals.iter().any(|held| held == medal) {
                user.medals.push(medal.clone());
            }
        }
        Ok(user.clone())
    }

    /// Fixture/seed insert; bypasses the user's `last_visit` bookkeeping.
    pub fn insert_check_in(&self, check_in: CheckIn) {
        self.inner.write().check_ins.push(check_in);
    }

    /// Fixture/seed insert with the same upsert-by-check-in semantics the
    /// trainer endpoint has.
    pub fn insert_validation(&self, validation: Validation) {
        let mut inner = self.inner.write();
        if let Some(existing) = inner
            .validations
            .iter_mut()
            .find(|existing| existing.check_in_id == validation.check_in_id)
        {
            *existing = validation;
            return;
        }
        inner.validations.push(validation);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GymStore for MemoryStore {
    fn find_user_by_id(&self, id: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    fn check_ins_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<CheckIn> {
        self.inner
            .read()
            .check_ins
            .iter()
            .filter(|check_in| {
                check_in.user_id == user_id
                    && check_in.check_in_time >= start
                    && check_in.check_in_time <= end
            })
            .cloned()
            .collect()
    }

    fn validations_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Validation> {
        self.inner
            .read()
            .validations
            .iter()
            .filter(|validation| {
                validation.user_id == user_id
                    && validation.date >= start
                    && validation.date <= end
            })
            .cloned()
            .collect()
    }
}
