use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    ensure_valid, is_filled, Email, MemberId, ProjectId, Rule, UserId,
    ValidationError,
};

pub const DEFAULT_MEMBER_ROLE: &str = "Member";

/// Membership lifecycle. `Removed` is terminal; rows are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberStatus {
    Confirmed,
    #[serde(rename = "Pending Confirmation")]
    PendingConfirmation,
    Removed,
    Rejected,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Confirmed => "Confirmed",
            MemberStatus::PendingConfirmation => "Pending Confirmation",
            MemberStatus::Removed => "Removed",
            MemberStatus::Rejected => "Rejected",
        }
    }

    /// Whether a row in this status may move to `next`. Re-inviting resets a
    /// row to pending outside these rules.
    pub fn can_transition_to(&self, next: MemberStatus) -> bool {
        use MemberStatus::*;

        matches!(
            (self, next),
            (PendingConfirmation, Confirmed | Rejected)
                | (Confirmed, Confirmed | Removed)
        )
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Confirmed" => Ok(MemberStatus::Confirmed),
            "Pending Confirmation" => Ok(MemberStatus::PendingConfirmation),
            "Removed" => Ok(MemberStatus::Removed),
            "Rejected" => Ok(MemberStatus::Rejected),
            _ => Err(ValidationError::new(format!(
                "Invalid member status: {s}"
            ))),
        }
    }
}

/// A person's place in a project. Invitees without an account are tracked by
/// email until they sign up.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub user_id: Option<UserId>,
    pub email: Option<Email>,
    pub role: String,
    pub status: MemberStatus,
}

impl Member {
    pub fn new(
        project_id: ProjectId,
        user_id: Option<UserId>,
        email: Option<Email>,
        status: MemberStatus,
    ) -> Self {
        Self {
            id: MemberId::default(),
            project_id,
            user_id,
            email,
            role: DEFAULT_MEMBER_ROLE.to_owned(),
            status,
        }
    }
}

/// Member as shown to clients, with display fields taken from the linked
/// account when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: MemberId,
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub image: String,
    pub role: String,
    pub status: MemberStatus,
}

/// Body of a role change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleUpdate {
    pub member_id: MemberId,
    #[serde(default)]
    pub role: String,
}

pub const ROLE_UPDATE_RULES: [Rule<RoleUpdate>; 1] =
    [Rule::new("role", "Role is required", |r| is_filled(&r.role))];

impl RoleUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_valid(self, &ROLE_UPDATE_RULES)
    }
}
