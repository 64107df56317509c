use crate::helpers::{
    add_new_project, get_json_response_body, get_random_email, invite,
    mount_email_server, sign_in, TestApp,
};
use builders_hub::routes::projects::MemberResponse;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_members_with_account_details(app: &mut TestApp) {
    let user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "array",
      "minItems": 1,
      "items": {
        "type": "object",
        "required": ["id", "name", "email", "image", "role", "status"],
        "properties": {
          "id": { "type": "string", "minLength": 36, "maxLength": 36 },
          "status": {
            "enum": ["Confirmed", "Pending Confirmation", "Removed", "Rejected"]
          }
        }
      }
    });

    let response = app.get_members(&project_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&schema, &body),
        "response does not match schema: {body}"
    );
    assert_eq!(body[0]["name"], "Alice");
    assert_eq!(body[0]["email"], user.email.as_str());
    assert_eq!(body[0]["role"], "Member");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_show_invitees_without_account_by_email(app: &mut TestApp) {
    let inviter = sign_in(app, "Alice").await;
    mount_email_server(app, 1).await;
    let invitee = get_random_email();
    let _invitation_id = invite(app, &inviter, &invitee).await;

    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let project = get_json_response_body(app.get_user_project(&hackathon_id).await).await;
    let project_id = project["id"].as_str().unwrap();

    let body = get_json_response_body(app.get_members(project_id).await).await;
    assert_eq!(body[1]["name"], invitee.as_str());
    assert_eq!(body[1]["user_id"], json!(null));
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_update_member_role(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;
    let members = get_json_response_body(app.get_members(&project_id).await).await;
    let member_id = members[0]["id"].as_str().unwrap().to_owned();

    let response = app
        .patch_member_role(
            &project_id,
            &json!({ "member_id": member_id, "role": " Lead Developer " }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let member = response
        .json::<MemberResponse>()
        .await
        .expect("Could not deserialise response body to MemberResponse");
    assert_eq!(member.role, "Lead Developer");
    assert_eq!(member.id.as_ref().to_string(), member_id);

    let members = get_json_response_body(app.get_members(&project_id).await).await;
    assert_eq!(members[0]["role"], "Lead Developer");
    assert_eq!(members[0]["status"], "Confirmed");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_blank_role(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;
    let members = get_json_response_body(app.get_members(&project_id).await).await;

    let response = app
        .patch_member_role(
            &project_id,
            &json!({ "member_id": members[0]["id"], "role": "  " }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let body = get_json_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "role");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_member_of_another_project(app: &mut TestApp) {
    let _alice = sign_in(app, "Alice").await;
    let alice_project = add_new_project(app, "Subnet Explorer").await;
    let _bob = sign_in(app, "Bob").await;
    let bob_project = add_new_project(app, "Wallet Kit").await;

    let members = get_json_response_body(app.get_members(&bob_project).await).await;
    let response = app
        .patch_member_role(
            &alice_project,
            &json!({ "member_id": members[0]["id"], "role": "Designer" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_non_existent_project_id(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;

    let response = app.get_members("be9915f0-a4c2-48fb-977b-9f4f959c5729").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_if_not_authenticated(app: &mut TestApp) {
    let response = app.get_members("be9915f0-a4c2-48fb-977b-9f4f959c5729").await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .patch_member_role(
            "be9915f0-a4c2-48fb-977b-9f4f959c5729",
            &json!({
                "member_id": "ae9915f0-a4c2-48fb-977b-9f4f959c5729",
                "role": "Designer"
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 401);
}
