use crate::helpers::{
    add_new_project, get_json_response_body, invite, mount_email_server,
    sign_in, sign_in_as, TestApp,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_describe_a_pending_invitation(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitation_id = invite(app, &inviter, invitee.email.as_str()).await;

    sign_in_as(app, &invitee);
    let user_id = invitee.id.as_ref().to_string();
    let response = app
        .get_check_invitation(&[
            ("invitation", invitation_id.as_str()),
            ("user_id", user_id.as_str()),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["exists"], true);
    assert_eq!(body["isConfirming"], true);
    assert_eq!(body["hasConfirmedProject"], false);
    assert_eq!(body["projectName"], "Untitled Project");
    assert_eq!(body["confirmedProjectName"], json!(null));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_report_a_conflicting_confirmed_project(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let _own_project = add_new_project(app, "Bob's Thing").await;

    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitation_id = invite(app, &inviter, invitee.email.as_str()).await;

    sign_in_as(app, &invitee);
    let response = app
        .get_check_invitation(&[("invitation", invitation_id.as_str())])
        .await;

    let body = get_json_response_body(response).await;
    assert_eq!(body["exists"], true);
    assert_eq!(body["isConfirming"], false);
    assert_eq!(body["hasConfirmedProject"], true);
    assert_eq!(body["confirmedProjectName"], "Bob's Thing");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_hide_invitations_addressed_to_someone_else(app: &mut TestApp) {
    let invitee = sign_in(app, "Bob").await;
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitation_id = invite(app, &inviter, invitee.email.as_str()).await;

    let _stranger = sign_in(app, "Carol").await;
    let response = app
        .get_check_invitation(&[("invitation", invitation_id.as_str())])
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["exists"], false);
    assert_eq!(body["projectId"], json!(null));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_user_id_is_not_the_session_user(
    app: &mut TestApp,
) {
    let _user = sign_in(app, "Bob").await;

    let response = app
        .get_check_invitation(&[
            ("invitation", "be9915f0-a4c2-48fb-977b-9f4f959c5729"),
            ("user_id", "ae9915f0-a4c2-48fb-977b-9f4f959c5729"),
        ])
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_if_not_authenticated(app: &mut TestApp) {
    let response = app
        .get_check_invitation(&[(
            "invitation",
            "be9915f0-a4c2-48fb-977b-9f4f959c5729",
        )])
        .await;
    assert_eq!(response.status().as_u16(), 401);
}
