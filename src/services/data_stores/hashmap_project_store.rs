use std::collections::HashMap;

use crate::domain::{
    ExclusiveConfirmation, Hackathon, HackathonId, Member, MemberId,
    MemberStatus, Person, Prize, Project, ProjectFilter, ProjectId,
    ProjectStore, ProjectStoreError,
};

/// In-memory project store. Every method runs under `&mut self` or `&self`,
/// so multi-row writes are atomic with respect to the surrounding lock.
#[derive(Default)]
pub struct HashmapProjectStore {
    hackathons: HashMap<HackathonId, Hackathon>,
    projects: Vec<Project>,
    members: Vec<Member>,
    prizes: Vec<Prize>,
}

impl HashmapProjectStore {
    fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == project_id)
    }

    fn has_prize(&self, project_id: &ProjectId) -> bool {
        self.prizes.iter().any(|p| &p.project_id == project_id)
    }

    fn in_hackathon(&self, member: &Member, hackathon_id: &HackathonId) -> bool {
        self.project(&member.project_id)
            .is_some_and(|p| &p.hackathon_id == hackathon_id)
    }
}

#[async_trait::async_trait]
impl ProjectStore for HashmapProjectStore {
    async fn add_hackathon(
        &mut self,
        hackathon: &Hackathon,
    ) -> Result<(), ProjectStoreError> {
        self.hackathons
            .insert(hackathon.id.clone(), hackathon.clone());
        Ok(())
    }

    async fn get_hackathon(
        &self,
        hackathon_id: &HackathonId,
    ) -> Result<Hackathon, ProjectStoreError> {
        self.hackathons
            .get(hackathon_id)
            .cloned()
            .ok_or(ProjectStoreError::HackathonIDNotFound)
    }

    async fn add_project(
        &mut self,
        project: &Project,
        creator: Option<&Member>,
    ) -> Result<(), ProjectStoreError> {
        if !self.hackathons.contains_key(&project.hackathon_id) {
            return Err(ProjectStoreError::HackathonIDNotFound);
        }
        if self.project(&project.id).is_some() {
            return Err(ProjectStoreError::ProjectIDExists);
        }
        if let Some(member) = creator {
            if self.members.iter().any(|m| m.id == member.id) {
                return Err(ProjectStoreError::MemberIDExists);
            }
        }

        self.projects.push(project.clone());
        if let Some(member) = creator {
            self.members.push(member.clone());
        }
        Ok(())
    }

    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, ProjectStoreError> {
        self.project(project_id)
            .cloned()
            .ok_or(ProjectStoreError::ProjectIDNotFound)
    }

    async fn update_project(
        &mut self,
        project: &Project,
    ) -> Result<(), ProjectStoreError> {
        let existing = self
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or(ProjectStoreError::ProjectIDNotFound)?;
        *existing = project.clone();
        Ok(())
    }

    async fn get_confirmed_projects(
        &self,
        hackathon_id: &HackathonId,
        person: &Person,
    ) -> Result<Vec<Project>, ProjectStoreError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| &p.hackathon_id == hackathon_id)
            .filter(|p| {
                self.members.iter().any(|m| {
                    m.project_id == p.id
                        && m.status == MemberStatus::Confirmed
                        && person.matches(m)
                })
            })
            .cloned()
            .collect())
    }

    async fn search_projects(
        &self,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), ProjectStoreError> {
        let matching: Vec<&Project> = self
            .projects
            .iter()
            .rev()
            .filter(|p| filter.matches(p, self.has_prize(&p.id)))
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn add_prize(&mut self, prize: &Prize) -> Result<(), ProjectStoreError> {
        if self.project(&prize.project_id).is_none() {
            return Err(ProjectStoreError::ProjectIDNotFound);
        }
        self.prizes.push(prize.clone());
        Ok(())
    }

    async fn get_prizes(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Prize>, ProjectStoreError> {
        Ok(self
            .prizes
            .iter()
            .filter(|p| &p.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn add_member(
        &mut self,
        member: &Member,
    ) -> Result<(), ProjectStoreError> {
        if self.project(&member.project_id).is_none() {
            return Err(ProjectStoreError::ProjectIDNotFound);
        }
        if self.members.iter().any(|m| m.id == member.id) {
            return Err(ProjectStoreError::MemberIDExists);
        }
        self.members.push(member.clone());
        Ok(())
    }

    async fn get_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Member, ProjectStoreError> {
        self.members
            .iter()
            .find(|m| &m.id == member_id)
            .cloned()
            .ok_or(ProjectStoreError::MemberIDNotFound)
    }

    async fn get_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Member>, ProjectStoreError> {
        Ok(self
            .members
            .iter()
            .filter(|m| &m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn find_member(
        &self,
        project_id: &ProjectId,
        person: &Person,
    ) -> Result<Option<Member>, ProjectStoreError> {
        Ok(person
            .find_in(self.members.iter().filter(|m| &m.project_id == project_id))
            .cloned())
    }

    async fn update_member_status(
        &mut self,
        member: &Member,
        exclusive: Option<ExclusiveConfirmation<'_>>,
    ) -> Result<u64, ProjectStoreError> {
        if !self.members.iter().any(|m| m.id == member.id) {
            return Err(ProjectStoreError::MemberIDNotFound);
        }

        let mut demoted = 0;
        if let Some(scope) = exclusive {
            let siblings: Vec<MemberId> = self
                .members
                .iter()
                .filter(|m| {
                    m.id != member.id
                        && m.project_id != member.project_id
                        && m.status == MemberStatus::Confirmed
                        && scope.person.matches(m)
                        && self.in_hackathon(m, scope.hackathon_id)
                })
                .map(|m| m.id.clone())
                .collect();

            for m in self.members.iter_mut() {
                if siblings.contains(&m.id) {
                    m.status = MemberStatus::Removed;
                    demoted += 1;
                }
            }
        }

        if let Some(existing) =
            self.members.iter_mut().find(|m| m.id == member.id)
        {
            existing.user_id = member.user_id.clone();
            existing.email = member.email.clone();
            existing.status = member.status;
        }
        Ok(demoted)
    }

    async fn update_member_role(
        &mut self,
        member_id: &MemberId,
        role: &str,
    ) -> Result<(), ProjectStoreError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| &m.id == member_id)
            .ok_or(ProjectStoreError::MemberIDNotFound)?;
        member.role = role.to_owned();
        Ok(())
    }
}
