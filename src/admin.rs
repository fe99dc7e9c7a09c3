//! Admin leaderboard gateway
//!
//! The only HTTP-reachable path that mutates the leaderboard. It overwrites
//! scores outright and reveals the event flag, so every call must present
//! the configured admin password. Upload credits never come through here;
//! they are an in-process call on the leaderboard itself.

use crate::error::ApiError;
use crate::leaderboard::{Leaderboard, RankedUser, UpdateMode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Data payload of a successful admin update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateData {
    pub leaderboard: Vec<RankedUser>,
    pub flag: String,
}

/// Outcome of a successful admin update.
#[derive(Debug, Clone)]
pub struct AdminUpdate {
    /// Success message for the caller.
    pub message: &'static str,
    pub data: AdminUpdateData,
}

/// Password-gated leaderboard overrides.
pub struct AdminGateway {
    leaderboard: Arc<Leaderboard>,
    admin_password: String,
    admin_flag: String,
}

impl AdminGateway {
    pub fn new(leaderboard: Arc<Leaderboard>, admin_password: String, admin_flag: String) -> Self {
        Self {
            leaderboard,
            admin_password,
            admin_flag,
        }
    }

    /// Overwrite a user's score and reveal the flag.
    ///
    /// Admin updates use `Set` semantics, never `Increment`: a correction
    /// lands exactly the score it names.
    pub fn update(
        &self,
        username: &str,
        points: i64,
        admin_password: &str,
    ) -> Result<AdminUpdate, ApiError> {
        let username = username.trim();
        if username.is_empty() || points < 0 {
            return Err(ApiError::Validation(
                "Invalid username or points".to_string(),
            ));
        }

        if admin_password != self.admin_password {
            warn!(username = %username, "Admin update rejected: wrong password");
            return Err(ApiError::Unauthorized);
        }

        let outcome = self.leaderboard.update(username, points, UpdateMode::Set);
        info!(
            username = %username,
            points = points,
            created = outcome.is_new,
            "Admin set leaderboard score"
        );

        let mut leaderboard = self.leaderboard.snapshot();
        if outcome.is_new {
            if let Some(row) = leaderboard.iter_mut().find(|row| row.username == username) {
                row.is_new = true;
            }
        }

        let message = if outcome.is_new {
            "User added to leaderboard successfully!"
        } else {
            "Leaderboard updated successfully!"
        };

        Ok(AdminUpdate {
            message,
            data: AdminUpdateData {
                leaderboard,
                flag: self.admin_flag.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "hunter2";
    const FLAG: &str = "flag{leaderboard-test}";

    fn gateway() -> (AdminGateway, Arc<Leaderboard>) {
        let leaderboard = Arc::new(Leaderboard::new());
        let gateway = AdminGateway::new(
            Arc::clone(&leaderboard),
            PASSWORD.to_string(),
            FLAG.to_string(),
        );
        (gateway, leaderboard)
    }

    #[test]
    fn wrong_password_is_unauthorized_and_changes_nothing() {
        let (gateway, leaderboard) = gateway();
        leaderboard.update("alice", 30, UpdateMode::Set);

        let err = gateway.update("alice", 999, "guess").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(leaderboard.snapshot()[0].score, 30);
    }

    #[test]
    fn set_overwrites_the_existing_score() {
        let (gateway, leaderboard) = gateway();
        leaderboard.update("alice", 30, UpdateMode::Increment);

        let update = gateway.update("alice", 50, PASSWORD).unwrap();
        assert_eq!(update.message, "Leaderboard updated successfully!");
        assert_eq!(leaderboard.snapshot()[0].score, 50);
    }

    #[test]
    fn new_user_is_marked_and_announced() {
        let (gateway, _) = gateway();
        let update = gateway.update("fresh", 10, PASSWORD).unwrap();
        assert_eq!(update.message, "User added to leaderboard successfully!");

        let row = update
            .data
            .leaderboard
            .iter()
            .find(|row| row.username == "fresh")
            .unwrap();
        assert!(row.is_new);
    }

    #[test]
    fn existing_user_is_not_marked_new() {
        let (gateway, leaderboard) = gateway();
        leaderboard.update("alice", 30, UpdateMode::Set);

        let update = gateway.update("alice", 60, PASSWORD).unwrap();
        assert!(update.data.leaderboard.iter().all(|row| !row.is_new));
    }

    #[test]
    fn flag_rides_along_on_success() {
        let (gateway, _) = gateway();
        let update = gateway.update("alice", 1, PASSWORD).unwrap();
        assert_eq!(update.data.flag, FLAG);
    }

    #[test]
    fn empty_username_is_invalid() {
        let (gateway, _) = gateway();
        let err = gateway.update("  ", 10, PASSWORD).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg == "Invalid username or points"));
    }

    #[test]
    fn negative_points_are_invalid() {
        let (gateway, leaderboard) = gateway();
        let err = gateway.update("alice", -5, PASSWORD).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(leaderboard.is_empty());
    }

    #[test]
    fn zero_points_are_allowed() {
        let (gateway, leaderboard) = gateway();
        gateway.update("alice", 0, PASSWORD).unwrap();
        assert_eq!(leaderboard.snapshot()[0].score, 0);
    }
}
