//! History and stats store backed by the in-memory [`AppData`] document.
//!
//! Callers hold the state lock while using these, then persist the document
//! with [`crate::storage::persist_data`].

use crate::errors::StoreError;
use crate::models::{AppData, CheckIn, Stats, UserProfile, UserRecord};
use chrono::NaiveDate;

impl AppData {
    /// Every check-in of the user, newest first. Unknown users have none.
    pub fn fetch_all_check_ins(&self, user_id: &str) -> Vec<CheckIn> {
        let mut check_ins = self
            .users
            .get(user_id)
            .map(|user| user.check_ins.clone())
            .unwrap_or_default();
        check_ins.sort_by(|a, b| (b.date, b.created_at).cmp(&(a.date, a.created_at)));
        check_ins
    }

    /// Check-ins dated inside the given month (1-based), oldest first.
    pub fn fetch_check_ins_for_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<CheckIn>, StoreError> {
        let (first_day, last_day) =
            month_bounds(year, month).ok_or(StoreError::InvalidMonth { year, month })?;

        let mut check_ins: Vec<CheckIn> = self
            .users
            .get(user_id)
            .map(|user| {
                user.check_ins
                    .iter()
                    .filter(|check_in| check_in.date >= first_day && check_in.date <= last_day)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        check_ins.sort_by_key(|check_in| (check_in.date, check_in.created_at));
        Ok(check_ins)
    }

    pub fn check_in_for_date(&self, user_id: &str, date: NaiveDate) -> Option<&CheckIn> {
        self.users
            .get(user_id)?
            .check_ins
            .iter()
            .find(|check_in| check_in.date == date)
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.get(user_id).map(|user| &user.profile)
    }

    /// Returns the user's record, creating it from `profile` on first use.
    pub fn user_or_insert_with(
        &mut self,
        user_id: &str,
        profile: impl FnOnce() -> UserProfile,
    ) -> &mut UserRecord {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord {
                profile: profile(),
                check_ins: Vec::new(),
                stats: None,
            })
    }

    /// Stores a check-in, keeping at most one per user per calendar date.
    pub fn insert_check_in(
        &mut self,
        user_id: &str,
        check_in: CheckIn,
        profile: impl FnOnce() -> UserProfile,
    ) -> Result<(), StoreError> {
        if self.check_in_for_date(user_id, check_in.date).is_some() {
            return Err(StoreError::AlreadyCheckedIn(check_in.date));
        }
        self.user_or_insert_with(user_id, profile)
            .check_ins
            .push(check_in);
        Ok(())
    }

    /// Overwrites the user's stats snapshot. Returns false for unknown users,
    /// whose stats are never stored.
    pub fn save_stats(&mut self, user_id: &str, stats: Stats) -> bool {
        match self.users.get_mut(user_id) {
            Some(user) => {
                user.stats = Some(stats);
                true
            }
            None => false,
        }
    }

    /// Puts the user's record back to an earlier snapshot, `None` meaning the
    /// user did not exist.
    pub fn restore_user(&mut self, user_id: &str, snapshot: Option<UserRecord>) {
        match snapshot {
            Some(record) => {
                self.users.insert(user_id.to_string(), record);
            }
            None => {
                self.users.remove(user_id);
            }
        }
    }
}

fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some((first_day, first_of_next.pred_opt()?))
}
