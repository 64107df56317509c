use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HackathonId(Uuid);

impl HackathonId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid hackathon ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for HackathonId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for HackathonId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hackathon {
    pub id: HackathonId,
    pub title: String,
}

impl Hackathon {
    pub fn new(title: &str) -> Self {
        Self {
            id: HackathonId::default(),
            title: title.to_owned(),
        }
    }
}
