//! Integration coverage for sessions, account settings, subscriptions, and
//! reports over HTTP.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{body_json, dispatch, get, post_json, put_json, register, router};

#[tokio::test]
async fn login_issues_a_working_session() {
    let (app, _services) = router();
    register(&app, "jkowalski", "jan@example.com").await;

    let (status, body) = post_json(
        &app,
        "/login",
        "",
        &json!({ "userName": "jkowalski", "password": "Tajne!Haslo1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "jkowalski");
    assert_eq!(body["role"], "USER");
    let token = body["token"].as_str().expect("token").to_string();

    let (status, verified) = get(&app, "/verify-token", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["valid"], true);
    assert_eq!(verified["email"], "jan@example.com");
}

#[tokio::test]
async fn bad_credentials_answer_401_with_the_backend_message() {
    let (app, _services) = router();
    register(&app, "jkowalski", "jan@example.com").await;

    let (status, body) = post_json(
        &app,
        "/login",
        "",
        &json!({ "userName": "jkowalski", "password": "zle-haslo" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, body) = get(&app, "/verify-token", "nie-taki-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn duplicate_registration_surfaces_the_server_message() {
    let (app, _services) = router();
    register(&app, "jkowalski", "jan@example.com").await;

    let payload = json!({
        "userName": "jkowalski",
        "password": "Tajne!Haslo1",
        "firstName": "Jan",
        "lastName": "Kowalski",
        "email": "inny@example.com",
    });
    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let response = dispatch(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn profile_round_trips_through_the_settings_endpoints() {
    let (app, _services) = router();
    let token = register(&app, "anowak", "anna@example.com").await;

    let (status, profile) = get(&app, "/users/profile", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "anowak");
    assert_eq!(profile["phone"], "");

    let update = json!({
        "firstName": "Anna",
        "lastName": "Nowak-Kowalska",
        "phone": "+48 600 100 200",
        "position": "Inspektor Ochrony Danych",
        "notifications": true,
    });
    let (status, body) = put_json(&app, "/users/profile", &token, &update).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, profile) = get(&app, "/users/profile", &token).await;
    assert_eq!(profile["lastName"], "Nowak-Kowalska");
    assert_eq!(profile["position"], "Inspektor Ochrony Danych");
    assert_eq!(profile["notifications"], true);
}

#[tokio::test]
async fn company_record_is_stored_per_account() {
    let (app, _services) = router();
    let token = register(&app, "firma", "firma@example.com").await;

    let company = json!({
        "name": "Acme Sp. z o.o.",
        "address": "ul. Prosta 1",
        "city": "Warszawa",
        "postalCode": "00-001",
        "nip": "5260001246",
        "regon": "012345678",
        "industry": "IT",
    });
    let (status, body) = put_json(&app, "/users/company", &token, &company).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, stored) = get(&app, "/users/company", &token).await;
    assert_eq!(stored["name"], "Acme Sp. z o.o.");
    assert_eq!(stored["postalCode"], "00-001");
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let (app, _services) = router();
    let token = register(&app, "haslo", "haslo@example.com").await;

    let (status, body) = put_json(
        &app,
        "/users/password",
        &token,
        &json!({ "currentPassword": "zle-haslo", "newPassword": "Nowe!Haslo2" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid current password");

    let (status, _) = put_json(
        &app,
        "/users/password",
        &token,
        &json!({ "currentPassword": "Tajne!Haslo1", "newPassword": "Nowe!Haslo2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/login",
        "",
        &json!({ "userName": "haslo", "password": "Nowe!Haslo2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn subscription_lifecycle_over_http() {
    let (app, _services) = router();
    let token = register(&app, "abonent", "abonent@example.com").await;

    let (status, subscription) = get(&app, "/subscriptions", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subscription["plan"], "free");
    assert_eq!(subscription["status"], "ACTIVE");

    let (status, plans) = get(&app, "/subscriptions/plans", &token).await;
    assert_eq!(status, StatusCode::OK);
    let plan_ids: Vec<&str> = plans
        .as_array()
        .expect("plan list")
        .iter()
        .map(|plan| plan["id"].as_str().expect("plan id"))
        .collect();
    assert!(plan_ids.contains(&"basic"));
    assert!(plan_ids.contains(&"premium"));

    let (status, body) =
        put_json(&app, "/subscriptions/plan", &token, &json!({ "plan": "premium" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"], "premium");

    // Same plan again: messaged no-op.
    let (_, body) =
        put_json(&app, "/subscriptions/plan", &token, &json!({ "plan": "premium" })).await;
    assert!(body["message"]
        .as_str()
        .expect("message")
        .contains("nie został zmieniony"));

    let (status, body) =
        put_json(&app, "/subscriptions/plan", &token, &json!({ "plan": "platynowy" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("platynowy"));

    let (status, body) = put_json(&app, "/subscriptions/cancel", &token, &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Subskrypcja została anulowana");

    let (_, body) = put_json(&app, "/subscriptions/cancel", &token, &json!({})).await;
    assert_eq!(body["message"], "Subskrypcja jest już anulowana");
}

#[tokio::test]
async fn reports_cover_the_callers_areas_and_export_csv() {
    let (app, _services) = router();
    let token = register(&app, "raport", "raport@example.com").await;

    let (_, mut draft) = get(&app, "/assessments/template", &token).await;
    draft["name"] = json!("Ocena do raportu");
    draft["chapters"][0]["areas"][0]["requirements"][0]["value"] = json!("yes");
    post_json(&app, "/assessments", &token, &draft).await;

    let (status, report) = get(&app, "/reports", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!report["complianceAreas"].as_array().expect("areas").is_empty());
    assert_eq!(report["remedialActions"].as_array().expect("actions").len(), 3);
    assert_eq!(report["trends"].as_array().expect("trend").len(), 6);

    let area_id = report["complianceAreas"][0]["id"]
        .as_str()
        .expect("area id")
        .to_string();
    let (status, detail) = get(&app, &format!("/reports/areas/{area_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], area_id.as_str());
    assert!(detail["requirements"].as_array().expect("rows").len() >= 1);
    assert_eq!(detail["requirements"][0]["answer"], "TAK");

    let (status, body) = get(&app, "/reports/areas/nie-ma", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Obszar o podanym ID nie istnieje");

    let request = Request::builder()
        .method("GET")
        .uri("/reports/2025/export?format=csv")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let response = dispatch(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/csv")
    );
}
