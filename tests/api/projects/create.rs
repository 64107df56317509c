use crate::helpers::{
    get_json_response_body, sign_in, submission, TestApp,
};
use builders_hub::ErrorResponse;
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_for_valid_submission(app: &mut TestApp) {
    let schema = json!({
      "$schema": "http://json-schema.org/draft-04/schema#",
      "type": "object",
      "properties": {
        "id": { "type": "string", "minLength": 36, "maxLength": 36 },
        "hackaton_id": { "type": "string", "minLength": 36, "maxLength": 36 },
        "project_name": { "type": "string", "minLength": 1 },
        "screenshots": { "type": "array" },
        "tracks": { "type": "array", "minItems": 1 },
        "isDraft": { "type": "boolean" }
      },
      "required": ["id", "hackaton_id", "project_name", "tracks", "isDraft"]
    });

    let response = app.post_projects(&submission(app, "Subnet Explorer")).await;
    assert_eq!(response.status().as_u16(), 201);

    let body = get_json_response_body(response).await;
    assert!(
        jsonschema::is_valid(&schema, &body),
        "response does not match schema: {body}"
    );
    assert_eq!(body["project_name"], "Subnet Explorer");
    assert_eq!(body["isDraft"], false);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_with_details_for_incomplete_submission(
    app: &mut TestApp,
) {
    let response = app
        .post_projects(&json!({
            "hackaton_id": app.hackathon.id.as_ref(),
            "isDraft": false
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let body = response
        .json::<ErrorResponse>()
        .await
        .expect("Could not deserialise response body to ErrorResponse");
    assert_eq!(body.error, "Validation failed");

    let fields: Vec<&str> =
        body.details.iter().map(|d| d.field.as_str()).collect();
    assert_eq!(fields, ["project_name", "short_description", "tracks"]);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_accept_incomplete_drafts(app: &mut TestApp) {
    let response = app
        .post_projects(&json!({
            "hackaton_id": app.hackathon.id.as_ref(),
            "project_name": "Half an idea",
            "isDraft": true
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body = get_json_response_body(response).await;
    assert_eq!(body["isDraft"], true);
    assert_eq!(body["short_description"], "");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_unknown_hackathon(app: &mut TestApp) {
    let mut body = submission(app, "Lost");
    body["hackaton_id"] = json!("be9915f0-a4c2-48fb-977b-9f4f959c5729");

    let response = app.post_projects(&body).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_request(app: &mut TestApp) {
    let test_cases = [
        json!({ "hackaton_id": "not-a-uuid", "project_name": "Foo" }),
        json!({ "hackaton_id": app.hackathon.id.as_ref(), "tracks": "Tooling" }),
    ];

    for test_case in test_cases.iter() {
        let response = app.post_projects(test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_overwrite_the_submitters_project_in_the_same_hackathon(
    app: &mut TestApp,
) {
    let user = sign_in(app, "Alice").await;

    let mut first = submission(app, "First take");
    first["user_id"] = json!(user.id.as_ref());
    let response = app.post_projects(&first).await;
    assert_eq!(response.status().as_u16(), 201);
    let first_id = get_json_response_body(response).await["id"].clone();

    let mut second = submission(app, "Second take");
    second["user_id"] = json!(user.id.as_ref());
    let response = app.post_projects(&second).await;
    assert_eq!(response.status().as_u16(), 201);
    let body = get_json_response_body(response).await;

    assert_eq!(body["id"], first_id);
    assert_eq!(body["project_name"], "Second take");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_create_project_for_session_user(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;

    let response = app.post_project(&submission(app, "Wallet Kit")).await;
    assert_eq!(response.status().as_u16(), 201);

    let project_id = get_json_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_owned();
    let members = get_json_response_body(app.get_members(&project_id).await).await;
    assert_eq!(members[0]["name"], "Alice");
    assert_eq!(members[0]["status"], "Confirmed");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_if_not_authenticated(app: &mut TestApp) {
    let response = app.post_project(&submission(app, "Wallet Kit")).await;
    assert_eq!(
        response.status().as_u16(),
        401,
        "Should return 401 for unauthenticated requests",
    );
}
