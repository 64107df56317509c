use crate::helpers::{
    add_new_project, get_json_response_body, invite, mount_email_server,
    sign_in, sign_in_as, TestApp,
};
use builders_hub::routes::projects::UpdateStatusResponse;
use builders_hub::domain::MemberStatus;
use serde_json::json;
use test_context::test_context;

async fn inviter_project_id(app: &TestApp) -> String {
    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let project = get_json_response_body(app.get_user_project(&hackathon_id).await).await;
    project["id"].as_str().unwrap().to_owned()
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_confirm_a_pending_invitation(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitation_id = invite(app, &inviter, invitee.email.as_str()).await;
    let project_id = inviter_project_id(app).await;

    sign_in_as(app, &invitee);
    let response = app
        .patch_member_status(&project_id, &json!({ "status": "Confirmed" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let change = response
        .json::<UpdateStatusResponse>()
        .await
        .expect("Could not deserialise response body to UpdateStatusResponse");
    assert_eq!(change.member.id.as_ref().to_string(), invitation_id);
    assert_eq!(change.member.status, MemberStatus::Confirmed);
    assert_eq!(change.member.user_id, Some(invitee.id.clone()));
    assert_eq!(change.removed_from_other_projects, 0);

    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let project = get_json_response_body(app.get_user_project(&hackathon_id).await).await;
    assert_eq!(project["id"], project_id.as_str());
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_leave_other_projects_when_confirming(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let own_project = add_new_project(app, "Bob's Thing").await;

    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let _invitation_id = invite(app, &inviter, invitee.email.as_str()).await;
    let project_id = inviter_project_id(app).await;

    sign_in_as(app, &invitee);
    let response = app
        .patch_member_status(
            &project_id,
            &json!({ "status": "Confirmed", "wasInOtherProject": true }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["removedFromOtherProjects"], 1);

    let members = get_json_response_body(app.get_members(&own_project).await).await;
    assert_eq!(
        members.as_array().unwrap().len(),
        0,
        "Removed members are not listed"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_reject_an_invitation(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let _invitation_id = invite(app, &inviter, invitee.email.as_str()).await;
    let project_id = inviter_project_id(app).await;

    sign_in_as(app, &invitee);
    let response = app
        .patch_member_status(&project_id, &json!({ "status": "Rejected" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["member"]["status"], "Rejected");
    assert_eq!(body["removedFromOtherProjects"], 0);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_without_membership(app: &mut TestApp) {
    let _alice = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let _stranger = sign_in(app, "Carol").await;
    let response = app
        .patch_member_status(&project_id, &json!({ "status": "Confirmed" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_for_unknown_status(app: &mut TestApp) {
    let _alice = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let response = app
        .patch_member_status(&project_id, &json!({ "status": "Maybe" }))
        .await;
    assert_eq!(response.status().as_u16(), 422);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_if_not_authenticated(app: &mut TestApp) {
    let response = app
        .patch_member_status(
            "be9915f0-a4c2-48fb-977b-9f4f959c5729",
            &json!({ "status": "Confirmed" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_an_invitation_linked_to_someone_else(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitation_id = invite(app, &inviter, invitee.email.as_str()).await;
    let project_id = inviter_project_id(app).await;

    let _mallory = sign_in(app, "Mallory").await;
    let response = app
        .patch_member_status(
            &project_id,
            &json!({ "status": "Confirmed", "email": invitee.email.as_str() }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let members = get_json_response_body(app.get_members(&project_id).await).await;
    let row = members
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == invitation_id.as_str())
        .expect("Invitation row is still listed");
    assert_eq!(row["status"], "Pending Confirmation");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_moves_outside_the_lifecycle(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let own_project = add_new_project(app, "Bob's Thing").await;

    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let _invitation_id = invite(app, &inviter, invitee.email.as_str()).await;
    let project_id = inviter_project_id(app).await;

    sign_in_as(app, &invitee);
    let response = app
        .patch_member_status(&project_id, &json!({ "status": "Confirmed" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let test_cases = [
        (project_id.as_str(), "Pending Confirmation"),
        (project_id.as_str(), "Removed"),
        (own_project.as_str(), "Confirmed"),
    ];
    for (project, status) in test_cases {
        let response = app
            .patch_member_status(project, &json!({ "status": status }))
            .await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Should fail with HTTP400 moving to {status} in {project}"
        );
    }
}
