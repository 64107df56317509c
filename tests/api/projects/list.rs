use crate::helpers::{get_json_response_body, submission, TestApp};
use serde_json::json;
use test_context::test_context;

async fn add_project(app: &TestApp, name: &str, tracks: &[&str]) {
    let mut body = submission(app, name);
    body["tracks"] = json!(tracks);
    let response = app.post_projects(&body).await;
    assert_eq!(response.status().as_u16(), 201, "Failed to add {name}");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_empty_page_if_no_projects(app: &mut TestApp) {
    let response = app.get_projects(&[]).await;
    assert_eq!(response.status().as_u16(), 200);

    let expected_body =
        json!({ "projects": [], "total": 0, "page": 1, "pageSize": 10 });
    assert_eq!(get_json_response_body(response).await, expected_body);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_list_newest_first_and_paginate(app: &mut TestApp) {
    for name in ["Alpha", "Beta", "Gamma"] {
        add_project(app, name, &["Tooling"]).await;
    }

    let response = app.get_projects(&[("page", "1"), ("pageSize", "2")]).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["projects"][0]["project_name"], "Gamma");
    assert_eq!(body["projects"][1]["project_name"], "Beta");

    let response = app.get_projects(&[("page", "2"), ("pageSize", "2")]).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);
    assert_eq!(body["projects"][0]["project_name"], "Alpha");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_filter_by_search_and_track(app: &mut TestApp) {
    add_project(app, "Subnet Explorer", &["Tooling"]).await;
    add_project(app, "Wallet Kit", &["Consumer"]).await;

    let response = app.get_projects(&[("search", "wallet")]).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["projects"][0]["project_name"], "Wallet Kit");

    let response = app.get_projects(&[("track", "Tooling")]).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["projects"][0]["project_name"], "Subnet Explorer");

    let hackathon_id = app.hackathon.id.as_ref().to_string();
    let response = app.get_projects(&[("event", hackathon_id.as_str())]).await;
    assert_eq!(get_json_response_body(response).await["total"], 2);

    let response = app.get_projects(&[("winningProjects", "true")]).await;
    assert_eq!(get_json_response_body(response).await["total"], 0);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_for_invalid_parameters(app: &mut TestApp) {
    let test_cases: [&[(&str, &str)]; 4] = [
        &[("page", "0")],
        &[("pageSize", "-1")],
        &[("page", "9223372036854775807"), ("pageSize", "2")],
        &[("events", "not-a-uuid")],
    ];

    for query in test_cases {
        let response = app.get_projects(query).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Should fail with HTTP400 for query: {:?}",
            query
        );
    }
}
