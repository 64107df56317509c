use crate::helpers::{
    add_new_project, get_json_response_body, sign_in, submission, TestApp,
};
use serde_json::json;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_replace_every_submitted_field(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let mut body = submission(app, "Subnet Explorer 2");
    body["demo_link"] = json!("https://demo.example.com");
    let response = app.put_project(&project_id, &body).await;
    assert_eq!(response.status().as_u16(), 200);

    let updated = get_json_response_body(response).await;
    assert_eq!(updated["id"], project_id.as_str());
    assert_eq!(updated["project_name"], "Subnet Explorer 2");
    assert_eq!(updated["demo_link"], "https://demo.example.com");

    let fetched = get_json_response_body(app.get_project(&project_id).await).await;
    assert_eq!(fetched["project_name"], "Subnet Explorer 2");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let _user = sign_in(app, "Alice").await;
    let project_id = add_new_project(app, "Subnet Explorer").await;

    let mut body = submission(app, "");
    body["tracks"] = json!([]);
    let response = app.put_project(&project_id, &body).await;
    assert_eq!(response.status().as_u16(), 400);

    let body = get_json_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "project_name");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_404_for_non_existent_project_id(app: &mut TestApp) {
    let response = app
        .put_project(
            "be9915f0-a4c2-48fb-977b-9f4f959c5729",
            &submission(app, "Ghost"),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}
