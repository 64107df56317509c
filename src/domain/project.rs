use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{
    ensure_valid, is_filled, HackathonId, ProjectAPIError, ProjectId, Rule,
    ValidationError,
};

pub const UNTITLED_PROJECT_NAME: &str = "Untitled Project";

/// A hackathon submission. Optional text fields are empty strings rather than
/// missing, so readers never have to deal with nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(rename = "hackaton_id", alias = "hackathon_id")]
    pub hackathon_id: HackathonId,
    pub project_name: String,
    pub short_description: String,
    pub full_description: String,
    pub tech_stack: String,
    pub github_repository: String,
    pub demo_link: String,
    pub logo_url: String,
    pub cover_url: String,
    pub demo_video_link: String,
    pub screenshots: Vec<String>,
    pub tracks: Vec<String>,
    pub is_preexisting_idea: bool,
    #[serde(rename = "isDraft")]
    pub is_draft: bool,
}

impl Project {
    pub fn new(hackathon_id: HackathonId, input: ProjectInput) -> Self {
        let mut project = Self::untitled(hackathon_id);
        project.replace_with(input);
        project
    }

    /// Placeholder project created when someone invites teammates before
    /// submitting anything.
    pub fn untitled(hackathon_id: HackathonId) -> Self {
        Self {
            id: ProjectId::default(),
            hackathon_id,
            project_name: UNTITLED_PROJECT_NAME.to_owned(),
            short_description: String::new(),
            full_description: String::new(),
            tech_stack: String::new(),
            github_repository: String::new(),
            demo_link: String::new(),
            logo_url: String::new(),
            cover_url: String::new(),
            demo_video_link: String::new(),
            screenshots: Vec::new(),
            tracks: Vec::new(),
            is_preexisting_idea: false,
            is_draft: true,
        }
    }

    /// Overwrites every submitted field. Identity and hackathon are kept.
    pub fn replace_with(&mut self, input: ProjectInput) {
        self.project_name = input.project_name;
        self.short_description = input.short_description;
        self.full_description = input.full_description;
        self.tech_stack = input.tech_stack;
        self.github_repository = input.github_repository;
        self.demo_link = input.demo_link;
        self.logo_url = input.logo_url;
        self.cover_url = input.cover_url;
        self.demo_video_link = input.demo_video_link;
        self.screenshots = input.screenshots;
        self.tracks = input.tracks;
        self.is_preexisting_idea = input.is_preexisting_idea;
        self.is_draft = input.is_draft;
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectInput {
    #[serde(default, rename = "hackaton_id", alias = "hackathon_id")]
    pub hackathon_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_stack: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub github_repository: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demo_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cover_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demo_video_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub screenshots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_preexisting_idea: bool,
    #[serde(default, rename = "isDraft", deserialize_with = "null_as_default")]
    pub is_draft: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub const PROJECT_SUBMISSION_RULES: [Rule<ProjectInput>; 4] = [
    Rule::new("project_name", "Project name is required", |p| {
        is_filled(&p.project_name)
    }),
    Rule::new("short_description", "Short description is required", |p| {
        is_filled(&p.short_description)
    }),
    Rule::new("hackaton_id", "Hackathon is required", |p| {
        p.hackathon_id.is_some()
    }),
    Rule::new("tracks", "Select at least one track", |p| {
        p.tracks.iter().any(|t| is_filled(t))
    }),
];

// Drafts may be incomplete but must still belong to a hackathon.
pub const PROJECT_DRAFT_RULES: [Rule<ProjectInput>; 1] =
    [Rule::new("hackaton_id", "Hackathon is required", |p| {
        p.hackathon_id.is_some()
    })];

impl ProjectInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_draft {
            ensure_valid(self, &PROJECT_DRAFT_RULES)
        } else {
            ensure_valid(self, &PROJECT_SUBMISSION_RULES)
        }
    }
}

/// Read-only award attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: Uuid,
    pub project_id: ProjectId,
    pub prize: String,
    pub track: String,
}

impl Prize {
    pub fn new(project_id: ProjectId, prize: &str, track: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            prize: prize.to_owned(),
            track: track.to_owned(),
        }
    }
}

/// Conjunctive listing filter. `search` matches any of its words against the
/// name or full description (case-insensitive), or the whole phrase against a
/// track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub hackathon_id: Option<HackathonId>,
    pub track: Option<String>,
    pub winning_only: bool,
}

impl ProjectFilter {
    pub fn search_phrase(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn search_terms(&self) -> Vec<&str> {
        self.search_phrase()
            .map(|phrase| phrase.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref().filter(|t| !t.is_empty())
    }

    pub fn matches(&self, project: &Project, has_prize: bool) -> bool {
        if let Some(hackathon_id) = &self.hackathon_id {
            if &project.hackathon_id != hackathon_id {
                return false;
            }
        }
        if let Some(track) = self.track() {
            if !project.tracks.iter().any(|t| t == track) {
                return false;
            }
        }
        if self.winning_only && !has_prize {
            return false;
        }
        match self.search_phrase() {
            None => true,
            Some(phrase) => {
                let name = project.project_name.to_lowercase();
                let description = project.full_description.to_lowercase();
                self.search_terms().iter().any(|term| {
                    let term = term.to_lowercase();
                    name.contains(&term) || description.contains(&term)
                }) || project.tracks.iter().any(|t| t == phrase)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    page_size: i64,
    offset: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Result<Self, ProjectAPIError> {
        if page <= 0 || page_size <= 0 {
            return Err(ProjectAPIError::BadRequest(
                "page and pageSize must be positive".to_owned(),
            ));
        }
        let offset = (page - 1).checked_mul(page_size).ok_or_else(|| {
            ProjectAPIError::BadRequest("page is out of range".to_owned())
        })?;
        Ok(Self {
            page,
            page_size,
            offset,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
}
