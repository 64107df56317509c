use color_eyre::eyre::eyre;
use sqlx::{postgres::PgArguments, PgPool, Postgres};
use uuid::Uuid;

use crate::domain::{
    Email, ExclusiveConfirmation, Hackathon, HackathonId, Member, MemberId,
    MemberStatus, Person, Prize, Project, ProjectFilter, ProjectId,
    ProjectStore, ProjectStoreError, UserId,
};

pub struct PostgresProjectStore {
    pool: PgPool,
}

impl PostgresProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PROJECT_COLUMNS: &str = "p.id, p.hackathon_id, p.project_name, \
    p.short_description, p.full_description, p.tech_stack, \
    p.github_repository, p.demo_link, p.logo_url, p.cover_url, \
    p.demo_video_link, p.screenshots, p.tracks, p.is_preexisting_idea, \
    p.is_draft";

const MEMBER_COLUMNS: &str =
    "m.id, m.project_id, m.user_id, m.email, m.role, m.status";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    hackathon_id: Uuid,
    project_name: String,
    short_description: String,
    full_description: String,
    tech_stack: String,
    github_repository: String,
    demo_link: String,
    logo_url: String,
    cover_url: String,
    demo_video_link: String,
    screenshots: Vec<String>,
    tracks: Vec<String>,
    is_preexisting_idea: bool,
    is_draft: bool,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: ProjectId::new(row.id),
            hackathon_id: HackathonId::new(row.hackathon_id),
            project_name: row.project_name,
            short_description: row.short_description,
            full_description: row.full_description,
            tech_stack: row.tech_stack,
            github_repository: row.github_repository,
            demo_link: row.demo_link,
            logo_url: row.logo_url,
            cover_url: row.cover_url,
            demo_video_link: row.demo_video_link,
            screenshots: row.screenshots,
            tracks: row.tracks,
            is_preexisting_idea: row.is_preexisting_idea,
            is_draft: row.is_draft,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    project_id: Uuid,
    user_id: Option<Uuid>,
    email: Option<String>,
    role: String,
    status: String,
}

impl TryFrom<MemberRow> for Member {
    type Error = ProjectStoreError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse_str)
            .transpose()
            .map_err(|e| ProjectStoreError::UnexpectedError(eyre!(e)))?;
        let status = row
            .status
            .parse::<MemberStatus>()
            .map_err(|e| ProjectStoreError::UnexpectedError(eyre!(e)))?;

        Ok(Member {
            id: MemberId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            user_id: row.user_id.map(UserId::new),
            email,
            role: row.role,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PrizeRow {
    id: Uuid,
    project_id: Uuid,
    prize: String,
    track: String,
}

// Matches member rows (aliased `m`) against a person's user ids, and against
// their emails on rows no account is linked to yet.
fn person_clause(user_ids_idx: u32, emails_idx: u32) -> String {
    format!(
        "(m.user_id = ANY(${user_ids_idx}) \
         OR (m.user_id IS NULL AND m.email = ANY(${emails_idx})))"
    )
}

fn unexpected(e: sqlx::Error) -> ProjectStoreError {
    ProjectStoreError::UnexpectedError(eyre!(e))
}

enum BindValue {
    Uuid(Uuid),
    Text(String),
}

/// Builds the WHERE clause for a listing filter. Returns the clause, the
/// values to bind in order, and the next free parameter index.
fn build_project_filter(filter: &ProjectFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions = Vec::new();
    let mut bind_values = Vec::new();
    let mut bind_idx = 1u32;

    if let Some(hackathon_id) = &filter.hackathon_id {
        conditions.push(format!("p.hackathon_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Uuid(*hackathon_id.as_ref()));
    }

    if let Some(track) = filter.track() {
        conditions.push(format!("${bind_idx} = ANY(p.tracks)"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(track.to_owned()));
    }

    if filter.winning_only {
        conditions.push(
            "EXISTS (SELECT 1 FROM prizes pr WHERE pr.project_id = p.id)"
                .to_owned(),
        );
    }

    if let Some(phrase) = filter.search_phrase() {
        let mut alternatives = Vec::new();
        for term in filter.search_terms() {
            alternatives.push(format!(
                "p.project_name ILIKE ${bind_idx} OR p.full_description ILIKE ${bind_idx}"
            ));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format!("%{}%", escape_like(term))));
        }
        alternatives.push(format!("${bind_idx} = ANY(p.tracks)"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(phrase.to_owned()));

        conditions.push(format!("({})", alternatives.join(" OR ")));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn bind_project_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Uuid(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

fn bind_project_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Uuid(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

#[async_trait::async_trait]
impl ProjectStore for PostgresProjectStore {
    #[tracing::instrument(name = "Adding hackathon to PostgreSQL", skip_all)]
    async fn add_hackathon(
        &mut self,
        hackathon: &Hackathon,
    ) -> Result<(), ProjectStoreError> {
        sqlx::query(
            r#"
            INSERT INTO hackathons (id, title) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title
            "#,
        )
        .bind(hackathon.id.as_ref())
        .bind(&hackathon.title)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting hackathon from PostgreSQL", skip_all)]
    async fn get_hackathon(
        &self,
        hackathon_id: &HackathonId,
    ) -> Result<Hackathon, ProjectStoreError> {
        let (id, title): (Uuid, String) =
            sqlx::query_as("SELECT id, title FROM hackathons WHERE id = $1")
                .bind(hackathon_id.as_ref())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::RowNotFound => {
                        ProjectStoreError::HackathonIDNotFound
                    }
                    e => unexpected(e),
                })?;

        Ok(Hackathon {
            id: HackathonId::new(id),
            title,
        })
    }

    #[tracing::instrument(name = "Adding project to PostgreSQL", skip_all)]
    async fn add_project(
        &mut self,
        project: &Project,
        creator: Option<&Member>,
    ) -> Result<(), ProjectStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, hackathon_id, project_name, short_description,
                full_description, tech_stack, github_repository, demo_link,
                logo_url, cover_url, demo_video_link, screenshots, tracks,
                is_preexisting_idea, is_draft
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(project.id.as_ref())
        .bind(project.hackathon_id.as_ref())
        .bind(&project.project_name)
        .bind(&project.short_description)
        .bind(&project.full_description)
        .bind(&project.tech_stack)
        .bind(&project.github_repository)
        .bind(&project.demo_link)
        .bind(&project.logo_url)
        .bind(&project.cover_url)
        .bind(&project.demo_video_link)
        .bind(&project.screenshots)
        .bind(&project.tracks)
        .bind(project.is_preexisting_idea)
        .bind(project.is_draft)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ProjectStoreError::ProjectIDExists
            }
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() =>
            {
                ProjectStoreError::HackathonIDNotFound
            }
            e => unexpected(e),
        })?;

        if let Some(member) = creator {
            insert_member(&mut tx, member).await?;
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting project from PostgreSQL", skip_all)]
    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, ProjectStoreError> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(project_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map(Project::from)
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ProjectStoreError::ProjectIDNotFound,
                e => unexpected(e),
            })
    }

    #[tracing::instrument(name = "Updating project in PostgreSQL", skip_all)]
    async fn update_project(
        &mut self,
        project: &Project,
    ) -> Result<(), ProjectStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                project_name = $2, short_description = $3,
                full_description = $4, tech_stack = $5,
                github_repository = $6, demo_link = $7, logo_url = $8,
                cover_url = $9, demo_video_link = $10, screenshots = $11,
                tracks = $12, is_preexisting_idea = $13, is_draft = $14,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(project.id.as_ref())
        .bind(&project.project_name)
        .bind(&project.short_description)
        .bind(&project.full_description)
        .bind(&project.tech_stack)
        .bind(&project.github_repository)
        .bind(&project.demo_link)
        .bind(&project.logo_url)
        .bind(&project.cover_url)
        .bind(&project.demo_video_link)
        .bind(&project.screenshots)
        .bind(&project.tracks)
        .bind(project.is_preexisting_idea)
        .bind(project.is_draft)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(ProjectStoreError::ProjectIDNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(
        name = "Getting confirmed projects from PostgreSQL",
        skip_all
    )]
    async fn get_confirmed_projects(
        &self,
        hackathon_id: &HackathonId,
        person: &Person,
    ) -> Result<Vec<Project>, ProjectStoreError> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p \
             WHERE p.hackathon_id = $1 AND EXISTS ( \
                SELECT 1 FROM members m \
                WHERE m.project_id = p.id AND m.status = $2 AND {person} \
             ) \
             ORDER BY p.created_at, p.id",
            person = person_clause(3, 4),
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(hackathon_id.as_ref())
            .bind(MemberStatus::Confirmed.as_str())
            .bind(person.user_ids())
            .bind(person.emails())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    #[tracing::instrument(name = "Searching projects in PostgreSQL", skip_all)]
    async fn search_projects(
        &self,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), ProjectStoreError> {
        let (where_clause, bind_values, bind_idx) = build_project_filter(filter);

        let count_query = format!("SELECT COUNT(*) FROM projects p {where_clause}");
        let total = bind_project_values_scalar(
            sqlx::query_scalar::<_, i64>(&count_query),
            &bind_values,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        let list_query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p {where_clause} \
             ORDER BY p.created_at DESC, p.id \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );
        let rows = bind_project_values(
            sqlx::query_as::<_, ProjectRow>(&list_query),
            &bind_values,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok((rows.into_iter().map(Project::from).collect(), total))
    }

    #[tracing::instrument(name = "Adding prize to PostgreSQL", skip_all)]
    async fn add_prize(&mut self, prize: &Prize) -> Result<(), ProjectStoreError> {
        sqlx::query(
            "INSERT INTO prizes (id, project_id, prize, track) VALUES ($1, $2, $3, $4)",
        )
        .bind(prize.id)
        .bind(prize.project_id.as_ref())
        .bind(&prize.prize)
        .bind(&prize.track)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() =>
            {
                ProjectStoreError::ProjectIDNotFound
            }
            e => unexpected(e),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting prizes from PostgreSQL", skip_all)]
    async fn get_prizes(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Prize>, ProjectStoreError> {
        let rows = sqlx::query_as::<_, PrizeRow>(
            "SELECT id, project_id, prize, track FROM prizes WHERE project_id = $1 ORDER BY prize",
        )
        .bind(project_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(rows
            .into_iter()
            .map(|row| Prize {
                id: row.id,
                project_id: ProjectId::new(row.project_id),
                prize: row.prize,
                track: row.track,
            })
            .collect())
    }

    #[tracing::instrument(name = "Adding member to PostgreSQL", skip_all)]
    async fn add_member(
        &mut self,
        member: &Member,
    ) -> Result<(), ProjectStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        insert_member(&mut tx, member).await?;
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    #[tracing::instrument(name = "Getting member from PostgreSQL", skip_all)]
    async fn get_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Member, ProjectStoreError> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM members m WHERE m.id = $1");
        sqlx::query_as::<_, MemberRow>(&query)
            .bind(member_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ProjectStoreError::MemberIDNotFound,
                e => unexpected(e),
            })?
            .try_into()
    }

    #[tracing::instrument(name = "Getting members from PostgreSQL", skip_all)]
    async fn get_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Member>, ProjectStoreError> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM members m \
             WHERE m.project_id = $1 ORDER BY m.created_at, m.id"
        );
        sqlx::query_as::<_, MemberRow>(&query)
            .bind(project_id.as_ref())
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?
            .into_iter()
            .map(Member::try_from)
            .collect()
    }

    #[tracing::instrument(name = "Finding member in PostgreSQL", skip_all)]
    async fn find_member(
        &self,
        project_id: &ProjectId,
        person: &Person,
    ) -> Result<Option<Member>, ProjectStoreError> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM members m \
             WHERE m.project_id = $1 AND {person} \
             ORDER BY (m.user_id IS NOT NULL AND m.user_id = ANY($2)) DESC, \
                      m.created_at, m.id \
             LIMIT 1",
            person = person_clause(2, 3),
        );
        sqlx::query_as::<_, MemberRow>(&query)
            .bind(project_id.as_ref())
            .bind(person.user_ids())
            .bind(person.emails())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(Member::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Updating member status in PostgreSQL", skip_all)]
    async fn update_member_status(
        &mut self,
        member: &Member,
        exclusive: Option<ExclusiveConfirmation<'_>>,
    ) -> Result<u64, ProjectStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let mut demoted = 0;
        if let Some(scope) = exclusive {
            // Serializes confirmations within a hackathon until commit.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
                .bind(scope.hackathon_id.as_ref().to_string())
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;

            let query = format!(
                "UPDATE members m SET status = $1, updated_at = now() \
                 WHERE m.status = $2 AND m.id <> $3 AND m.project_id IN ( \
                    SELECT p.id FROM projects p \
                    WHERE p.hackathon_id = $4 AND p.id <> $5 \
                 ) AND {person}",
                person = person_clause(6, 7),
            );
            demoted = sqlx::query(&query)
                .bind(MemberStatus::Removed.as_str())
                .bind(MemberStatus::Confirmed.as_str())
                .bind(member.id.as_ref())
                .bind(scope.hackathon_id.as_ref())
                .bind(member.project_id.as_ref())
                .bind(scope.person.user_ids())
                .bind(scope.person.emails())
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?
                .rows_affected();
        }

        let result = sqlx::query(
            r#"
            UPDATE members SET user_id = $2, email = $3, status = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(member.id.as_ref())
        .bind(member.user_id.as_ref().map(|id| *id.as_ref()))
        .bind(member.email.as_ref().map(|e| e.as_str().to_owned()))
        .bind(member.status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(ProjectStoreError::MemberIDNotFound);
        }

        tx.commit().await.map_err(unexpected)?;
        Ok(demoted)
    }

    #[tracing::instrument(name = "Updating member role in PostgreSQL", skip_all)]
    async fn update_member_role(
        &mut self,
        member_id: &MemberId,
        role: &str,
    ) -> Result<(), ProjectStoreError> {
        let result = sqlx::query(
            "UPDATE members SET role = $2, updated_at = now() WHERE id = $1",
        )
        .bind(member_id.as_ref())
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(ProjectStoreError::MemberIDNotFound);
        }
        Ok(())
    }
}

async fn insert_member(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    member: &Member,
) -> Result<(), ProjectStoreError> {
    sqlx::query(
        r#"
        INSERT INTO members (id, project_id, user_id, email, role, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(member.id.as_ref())
    .bind(member.project_id.as_ref())
    .bind(member.user_id.as_ref().map(|id| *id.as_ref()))
    .bind(member.email.as_ref().map(|e| e.as_str().to_owned()))
    .bind(&member.role)
    .bind(member.status.as_str())
    .execute(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ProjectStoreError::MemberIDExists
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            ProjectStoreError::ProjectIDNotFound
        }
        e => unexpected(e),
    })?;
    Ok(())
}
