use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ensure_valid, is_filled, Email, ProjectId, Rule, ValidationError};

/// Body of an invite request. Addresses stay raw so that a bad one can be
/// reported without rejecting the rest of the batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvitationRequest {
    pub hackathon_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub emails: Vec<String>,
}

pub const INVITATION_RULES: [Rule<InvitationRequest>; 2] = [
    Rule::new("emails", "At least one email is required", |r| {
        r.emails.iter().any(|e| is_filled(e))
    }),
    Rule::new("emails", "At least one email must be valid", |r| {
        r.emails.iter().any(|e| Email::parse_str(e).is_ok())
    }),
];

impl InvitationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_valid(self, &INVITATION_RULES)
    }
}

/// Per-address result of an invite batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationOutcome {
    pub project_id: Option<ProjectId>,
    pub invited: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvitationCheck {
    pub exists: bool,
    #[serde(rename = "isConfirming")]
    pub is_confirming: bool,
    #[serde(rename = "hasConfirmedProject")]
    pub has_confirmed_project: bool,
    #[serde(rename = "projectId")]
    pub project_id: Option<ProjectId>,
    #[serde(rename = "projectName")]
    pub project_name: Option<String>,
    #[serde(rename = "confirmedProjectName")]
    pub confirmed_project_name: Option<String>,
}
