use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid project ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ProjectId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[test]
fn test_valid_project_id() {
    let valid_id = "be9915f0-a4c2-48fb-977b-9f4f959c5729";
    let parsed = ProjectId::parse(valid_id).expect(valid_id);
    assert_eq!(parsed.as_ref().to_string(), valid_id);
}

#[test]
fn test_invalid_project_id() {
    let invalid_id = "ge9915f0-a4c2-48fb-977b-9f4f959c5729";
    let error = ProjectId::parse(invalid_id).expect_err(invalid_id);
    assert!(error.message().starts_with("Invalid project ID"));
}
