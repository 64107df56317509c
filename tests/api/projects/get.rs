use crate::helpers::{add_new_project, get_json_response_body, sign_in, TestApp};
use builders_hub::services::projects::ProjectDetails;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_project_with_members_and_hackathon(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let response = app.get_project(&project_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let details = response
        .json::<ProjectDetails>()
        .await
        .expect("Could not deserialise response body to ProjectDetails");
    assert_eq!(details.project.project_name, "Subnet Explorer");
    assert_eq!(details.hackathon, app.hackathon);
    assert_eq!(details.members.len(), 1);
    assert_eq!(details.members[0].name, "Alice");
    assert!(details.prizes.is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_non_existent_project_id(app: &mut TestApp) {
    let response = app.get_project("be9915f0-a4c2-48fb-977b-9f4f959c5729").await;
    assert_eq!(response.status().as_u16(), 404);

    let body = get_json_response_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_malformed_project_id(app: &mut TestApp) {
    let response = app.get_project("ge9915f0").await;
    assert_eq!(response.status().as_u16(), 400);
}
