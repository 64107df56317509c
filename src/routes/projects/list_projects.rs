use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    domain::{HackathonId, ProjectAPIError, ProjectFilter, ProjectPage},
    services::projects,
    utils::constants::DEFAULT_PAGE_SIZE,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
    pub search: Option<String>,
    #[serde(alias = "event")]
    pub events: Option<String>,
    pub track: Option<String>,
    #[serde(rename = "winningProjects")]
    pub winning_projects: Option<bool>,
}

impl ListProjectsQuery {
    fn filter(&self) -> Result<ProjectFilter, ProjectAPIError> {
        let hackathon_id = match self.events.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(HackathonId::parse(id)?),
            _ => None,
        };

        Ok(ProjectFilter {
            search: self.search.clone(),
            hackathon_id,
            track: self.track.clone(),
            winning_only: self.winning_projects.unwrap_or(false),
        })
    }
}

#[tracing::instrument(name = "List projects route handler", skip_all)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<(StatusCode, Json<ProjectPage>), ProjectAPIError> {
    let filter = query.filter()?;

    let page = projects::get_filtered_projects(
        &state,
        &filter,
        query.page.unwrap_or(1),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;

    Ok((StatusCode::OK, Json(page)))
}
