use uuid::Uuid;

use super::{Email, Member, User, UserId};

/// One way of recognising a person on a member row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonRef {
    ById(UserId),
    ByEmail(Email),
}

/// Every reference known for a person, resolved once from the session or the
/// request. Member rows match when any reference matches; rows linked by user
/// id take precedence over rows matched by email. An email only matches rows
/// not yet linked to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    refs: Vec<PersonRef>,
}

impl Person {
    pub fn from_user(user: &User) -> Self {
        Self::default()
            .with(PersonRef::ById(user.id.clone()))
            .with(PersonRef::ByEmail(user.email.clone()))
    }

    pub fn by_email(email: Email) -> Self {
        Self::default().with(PersonRef::ByEmail(email))
    }

    pub fn with(mut self, person_ref: PersonRef) -> Self {
        if !self.refs.contains(&person_ref) {
            self.refs.push(person_ref);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn refs(&self) -> &[PersonRef] {
        &self.refs
    }

    pub fn user_ids(&self) -> Vec<Uuid> {
        self.refs
            .iter()
            .filter_map(|r| match r {
                PersonRef::ById(id) => Some(*id.as_ref()),
                PersonRef::ByEmail(_) => None,
            })
            .collect()
    }

    pub fn emails(&self) -> Vec<String> {
        self.refs
            .iter()
            .filter_map(|r| match r {
                PersonRef::ByEmail(email) => Some(email.as_str().to_owned()),
                PersonRef::ById(_) => None,
            })
            .collect()
    }

    /// First user id reference, used when a row is created for this person.
    pub fn primary_user_id(&self) -> Option<UserId> {
        self.refs.iter().find_map(|r| match r {
            PersonRef::ById(id) => Some(id.clone()),
            PersonRef::ByEmail(_) => None,
        })
    }

    pub fn primary_email(&self) -> Option<Email> {
        self.refs.iter().find_map(|r| match r {
            PersonRef::ByEmail(email) => Some(email.clone()),
            PersonRef::ById(_) => None,
        })
    }

    pub fn matches_by_id(&self, member: &Member) -> bool {
        member.user_id.as_ref().is_some_and(|user_id| {
            self.refs.contains(&PersonRef::ById(user_id.clone()))
        })
    }

    pub fn matches(&self, member: &Member) -> bool {
        self.matches_by_id(member)
            || (member.user_id.is_none()
                && member.email.as_ref().is_some_and(|email| {
                    self.refs.contains(&PersonRef::ByEmail(email.clone()))
                }))
    }

    /// Picks the best matching row: linked by user id first, then by email.
    pub fn find_in<'a, I>(&self, members: I) -> Option<&'a Member>
    where
        I: IntoIterator<Item = &'a Member>,
    {
        let candidates: Vec<&Member> =
            members.into_iter().filter(|m| self.matches(m)).collect();
        candidates
            .iter()
            .find(|m| self.matches_by_id(m))
            .or_else(|| candidates.first())
            .copied()
    }
}
