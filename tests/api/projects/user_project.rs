use crate::helpers::{add_new_project, get_json_response_body, sign_in, TestApp};
use serde_json::Value;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_null_when_user_has_no_project(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;

    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let response = app.get_user_project(&hackathon_id).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(get_json_response_body(response).await, Value::Null);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_the_users_confirmed_project(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let body = get_json_response_body(app.get_user_project(&hackathon_id).await).await;
    assert_eq!(body["id"], project_id.as_str());

    let _other = sign_in(app, "Bob").await;
    let body = get_json_response_body(app.get_user_project(&hackathon_id).await).await;
    assert_eq!(body, Value::Null, "Projects of other users are not returned");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_if_not_authenticated(app: &mut TestApp) {
    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let response = app.get_user_project(&hackathon_id).await;
    assert_eq!(response.status().as_u16(), 401);
}
