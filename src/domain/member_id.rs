use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid member ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for MemberId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[test]
fn test_invalid_member_id() {
    let invalid_id = "5b5b32e3a66cc-45bc-82d1-d41582139f1e";
    let error = MemberId::parse(invalid_id).expect_err(invalid_id);
    assert_eq!(error.message(), "Invalid member ID: failed to parse a UUID");
}
