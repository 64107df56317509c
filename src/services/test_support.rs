use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{
    app_state::AppState,
    domain::{Email, Hackathon, ProjectInput, ProjectStore, User, UserStore},
    services::{
        data_stores::{
            HashmapProjectStore, HashmapRateLimitStore, HashmapUserStore,
        },
        mock_email_client::MockEmailClient,
    },
};

pub struct TestState {
    pub state: AppState,
    pub hackathon: Hackathon,
    pub alice: User,
    pub bob: User,
    pub email_client: Arc<MockEmailClient>,
}

pub async fn seeded_state() -> TestState {
    seeded_state_with(MockEmailClient::default(), 100).await
}

/// In-memory state with one hackathon and two registered users.
pub async fn seeded_state_with(
    email_client: MockEmailClient,
    invite_budget: u32,
) -> TestState {
    let hackathon = Hackathon::new("Summit Hack");
    let alice = User::new(Email::parse_str("alice@example.com").unwrap(), "Alice");
    let bob = User::new(Email::parse_str("bob@example.com").unwrap(), "Bob");

    let mut users = HashmapUserStore::default();
    users.add_user(alice.clone()).await.unwrap();
    users.add_user(bob.clone()).await.unwrap();

    let mut projects = HashmapProjectStore::default();
    projects.add_hackathon(&hackathon).await.unwrap();

    let email_client = Arc::new(email_client);
    let state = AppState::new(
        Arc::new(RwLock::new(users)),
        Arc::new(RwLock::new(projects)),
        email_client.clone(),
        Arc::new(RwLock::new(HashmapRateLimitStore::new(
            invite_budget,
            Duration::from_secs(60),
        ))),
    );

    TestState {
        state,
        hackathon,
        alice,
        bob,
        email_client,
    }
}

/// A complete submission for `hackathon`.
pub fn project_input(hackathon: &Hackathon) -> ProjectInput {
    ProjectInput {
        hackathon_id: Some(*hackathon.id.as_ref()),
        project_name: "Subnet Explorer".to_owned(),
        short_description: "Browse subnets".to_owned(),
        tracks: vec!["Tooling".to_owned()],
        ..ProjectInput::default()
    }
}
