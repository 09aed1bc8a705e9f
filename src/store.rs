use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::attendance::AttendanceRecord;
use crate::model::claim::ReplacementClaim;
use crate::model::leave_request::LeaveRequest;
use crate::model::notification::Notification;
use crate::model::role::Role;
use crate::model::user::{LeaveAdjustments, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode data file: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The six persisted collections. Every field defaults so a data file
/// written by an older build still loads; per-record defaults (e.g. missing
/// `leave_adjustments`) are handled once here by serde rather than at each
/// call site.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    #[serde(default)]
    pub claims: Vec<ReplacementClaim>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Id of the most recently logged-in user.
    #[serde(default)]
    pub current_user: Option<String>,
}

/// Process-local record store backed by a single JSON file.
///
/// All reads and writes go through one `RwLock`, so a multi-step mutation
/// passed to [`Store::mutate`] commits as a single logical operation:
/// concurrent readers never observe a claim approved without its balance
/// credit, or vice versa.
pub struct Store {
    path: PathBuf,
    state: RwLock<State>,
}

impl Store {
    /// Opens the store at `path`, seeding a fresh data file with the two
    /// default accounts when none exists yet.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            info!(path = %path.display(), "No data file found, seeding defaults");
            seed_state()
        };

        let store = Store {
            path,
            state: RwLock::new(state),
        };
        // Write the (possibly seeded) state back so the file exists from
        // the first start onwards.
        store.mutate(|_| ())?;
        Ok(store)
    }

    /// Runs `f` against a snapshot of the state under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let state = self.state.read().expect("store lock poisoned");
        f(&state)
    }

    /// Runs `f` under the write lock and persists the result to disk before
    /// the lock is released.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut State) -> R) -> StoreResult<R> {
        let mut state = self.state.write().expect("store lock poisoned");
        let result = f(&mut state);
        let encoded = serde_json::to_string_pretty(&*state)?;
        fs::write(&self.path, encoded)?;
        Ok(result)
    }

    // ---- Users ----

    pub fn users(&self) -> Vec<User> {
        self.read(|s| s.users.clone())
    }

    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.read(|s| s.users.iter().find(|u| u.id == id).cloned())
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.read(|s| s.users.iter().find(|u| u.username == username).cloned())
    }

    pub fn add_user(&self, user: User) -> StoreResult<()> {
        self.mutate(|s| s.users.push(user))
    }

    /// Replaces the stored user with the same id. Returns `false` when the
    /// id is unknown so the caller can log and surface it.
    pub fn update_user(&self, user: User) -> StoreResult<bool> {
        self.mutate(|s| match s.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        })
    }

    pub fn delete_user(&self, id: &str) -> StoreResult<bool> {
        self.mutate(|s| {
            let before = s.users.len();
            s.users.retain(|u| u.id != id);
            s.users.len() != before
        })
    }

    // ---- Leave requests ----

    /// Leave requests, newest application first, optionally scoped to one
    /// owner.
    pub fn leaves(&self, owner: Option<&str>) -> Vec<LeaveRequest> {
        self.read(|s| {
            let mut out: Vec<_> = s
                .leaves
                .iter()
                .filter(|l| owner.is_none_or(|id| l.user_id == id))
                .cloned()
                .collect();
            out.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
            out
        })
    }

    pub fn leave_by_id(&self, id: &str) -> Option<LeaveRequest> {
        self.read(|s| s.leaves.iter().find(|l| l.id == id).cloned())
    }

    pub fn append_leave(&self, leave: LeaveRequest) -> StoreResult<()> {
        self.mutate(|s| s.leaves.push(leave))
    }

    // ---- Replacement claims ----

    pub fn claims(&self, owner: Option<&str>) -> Vec<ReplacementClaim> {
        self.read(|s| {
            let mut out: Vec<_> = s
                .claims
                .iter()
                .filter(|c| owner.is_none_or(|id| c.user_id == id))
                .cloned()
                .collect();
            out.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
            out
        })
    }

    pub fn claim_by_id(&self, id: &str) -> Option<ReplacementClaim> {
        self.read(|s| s.claims.iter().find(|c| c.id == id).cloned())
    }

    pub fn append_claim(&self, claim: ReplacementClaim) -> StoreResult<()> {
        self.mutate(|s| s.claims.push(claim))
    }

    // ---- Attendance ----

    pub fn attendance(&self, owner: Option<&str>) -> Vec<AttendanceRecord> {
        self.read(|s| {
            let mut out: Vec<_> = s
                .attendance
                .iter()
                .filter(|a| owner.is_none_or(|id| a.user_id == id))
                .cloned()
                .collect();
            out.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
            out
        })
    }

    pub fn attendance_on(&self, user_id: &str, date: NaiveDate) -> Option<AttendanceRecord> {
        self.read(|s| {
            s.attendance
                .iter()
                .find(|a| a.user_id == user_id && a.date == date)
                .cloned()
        })
    }

    // ---- Session ----

    pub fn set_current_user(&self, user_id: Option<String>) -> StoreResult<()> {
        self.mutate(|s| s.current_user = user_id)
    }
}

fn seed_user(id: &str, username: &str, full_name: &str, position: &str, joining: NaiveDate, role: Role) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        password: "password".to_string(),
        full_name: full_name.to_string(),
        position: position.to_string(),
        joining_date: joining,
        role,
        leave_adjustments: LeaveAdjustments::default(),
        adjustment_logs: Vec::new(),
    }
}

fn seed_state() -> State {
    let director_joined = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid seed date");
    let staff_joined = NaiveDate::from_ymd_opt(2022, 5, 15).expect("valid seed date");
    State {
        users: vec![
            seed_user("admin-1", "admin", "Jenco Director", "Director", director_joined, Role::Admin),
            seed_user("staff-1", "alex", "Alex Tan", "Marketing Exec", staff_joined, Role::Staff),
        ],
        ..State::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    use crate::model::leave_request::{LeaveDuration, LeaveStatus, LeaveType};

    fn sample_leave(id: &str, user_id: &str) -> LeaveRequest {
        LeaveRequest {
            id: id.to_string(),
            user_id: user_id.to_string(),
            user_name: "Alex Tan".to_string(),
            leave_type: LeaveType::Annual,
            duration: LeaveDuration::Full,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 6).unwrap(),
            reason: "trip".to_string(),
            attachment_url: None,
            status: LeaveStatus::Pending,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn seeds_default_accounts_on_first_open() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("hr.json")).unwrap();

        let users = store.users();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "admin" && u.role == Role::Admin));
        assert!(users.iter().any(|u| u.username == "alex" && u.role == Role::Staff));
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hr.json");

        {
            let store = Store::open(&path).unwrap();
            store.append_leave(sample_leave("leave-1", "staff-1")).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(store.leaves(None).len(), 1);
        assert_eq!(store.leaves(Some("staff-1")).len(), 1);
        assert!(store.leaves(Some("admin-1")).is_empty());
    }

    #[test]
    fn normalizes_legacy_users_missing_adjustments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hr.json");
        let legacy = r#"{
            "users": [{
                "id": "staff-9",
                "username": "lee",
                "password": "password",
                "full_name": "Lee Min",
                "position": "Clerk",
                "joining_date": "2019-03-01",
                "role": "STAFF"
            }]
        }"#;
        fs::write(&path, legacy).unwrap();

        let store = Store::open(&path).unwrap();
        let user = store.user_by_id("staff-9").unwrap();
        assert_eq!(user.leave_adjustments.annual_leave_adjustment, 0.0);
        assert_eq!(user.leave_adjustments.replacement_leave_balance, 0.0);
        assert!(user.adjustment_logs.is_empty());
    }

    #[test]
    fn update_of_unknown_user_reports_no_match() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("hr.json")).unwrap();

        let mut ghost = store.user_by_id("staff-1").unwrap();
        ghost.id = "no-such-id".to_string();
        assert!(!store.update_user(ghost).unwrap());
    }

    #[test]
    fn leaves_sorted_newest_first() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("hr.json")).unwrap();

        let mut older = sample_leave("leave-old", "staff-1");
        older.applied_at = Utc::now() - chrono::Duration::hours(2);
        store.append_leave(older).unwrap();
        store.append_leave(sample_leave("leave-new", "staff-1")).unwrap();

        let leaves = store.leaves(Some("staff-1"));
        assert_eq!(leaves[0].id, "leave-new");
        assert_eq!(leaves[1].id, "leave-old");
    }
}
