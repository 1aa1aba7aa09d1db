use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use api_types::{Id, challenge::ChallengeBody, user::Role};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
};
use client::{Client, ClientError, Session, transactions::wire_id};
use engine::{Category, DayKey, EngineError, TransactionId, TransactionStatus, aggregate};
use serde_json::{Value, json};

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Mock {
    transaction_status: Arc<Mutex<i64>>,
    puts: Arc<Mutex<Vec<Value>>>,
    posted: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "bad credentials"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "ok",
            "data": {
                "token": TOKEN,
                "user": {"id": 1, "userName": "admin", "email": body["email"], "role": 1}
            }
        })),
    )
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "expired"})));
    }
    (
        StatusCode::OK,
        Json(json!({"id": 1, "userName": "admin", "email": "a@x.io", "role": 1, "subscriptionType": 2})),
    )
}

async fn users(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    let page: u32 = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "",
            "data": {
                "data": [
                    {"id": 11, "userName": "lan", "email": "lan@x.io", "role": 3, "subscriptionType": 2},
                    {"id": 12, "userName": "minh", "email": "minh@x.io", "role": 2, "dateOfBirth": "0001-01-01T00:00:00"}
                ],
                "page": page,
                "pageSize": 2,
                "totalCount": 5,
                "totalPages": 3,
                "hasNextPage": true,
                "hasPreviousPage": page > 1
            }
        })),
    )
}

async fn transactions(State(mock): State<Mock>) -> Json<Value> {
    let status = *mock.transaction_status.lock().unwrap();
    Json(json!([
        {"id": 7, "userId": 3, "userName": "vy", "totalPayment": 1300000, "paymentDate": "2025-09-25T00:00:00", "status": status, "reason": null}
    ]))
}

async fn transaction_get(State(mock): State<Mock>, Path(id): Path<i64>) -> impl IntoResponse {
    if id != 7 {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "missing"})));
    }
    let status = *mock.transaction_status.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "",
            "data": {"id": 7, "userId": 3, "userName": "vy", "totalPayment": 1300000, "paymentDate": "2025-09-25T00:00:00", "status": status, "reason": null}
        })),
    )
}

async fn transaction_put(
    State(mock): State<Mock>,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if let Some(status) = body["status"].as_i64() {
        *mock.transaction_status.lock().unwrap() = status;
    }
    mock.puts.lock().unwrap().push(body.clone());
    Json(json!({"success": true, "message": "updated", "data": body}))
}

async fn challenge_post(State(mock): State<Mock>, Json(body): Json<Value>) -> StatusCode {
    mock.posted.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn role_put(Path(id): Path<i64>, Json(body): Json<Value>) -> impl IntoResponse {
    if body["role"] != 3 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "unexpected role"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"data": {"id": id, "userName": "lan", "email": "lan@x.io", "role": 3}})),
    )
}

async fn activities() -> Json<Value> {
    Json(json!([
        {"date": "2025-10-02T08:30:00Z", "plasticUsage": {"cO2emission": 3.0}, "trafficUsage": {"cO2emission": 1.0}, "energyUsage": null, "foodUsage": {"cO2emission": null}},
        {"date": "2025-10-02", "plasticUsage": {"cO2emission": 1.0}, "trafficUsage": null, "energyUsage": {"cO2emission": 5.0}, "foodUsage": null},
        {"date": "2025-10-01", "plasticUsage": {"cO2emission": 9.0}}
    ]))
}

async fn leaderboard() -> Json<Value> {
    Json(json!([
        {"userName": "a", "totalCO2Emission": 4.5},
        {"userName": null, "totalCO2Emission": null}
    ]))
}

async fn spawn(mock: Mock) -> String {
    let api = Router::new()
        .route("/User/login", post(login))
        .route("/User/me", get(me))
        .route("/User", get(users))
        .route("/User/{id}/role", put(role_put))
        .route("/Transaction", get(transactions))
        .route(
            "/Transaction/{id}",
            get(transaction_get).put(transaction_put),
        )
        .route("/Challenge", post(challenge_post))
        .route("/UserActivities", get(activities))
        .route("/UserActivities/LeaderBoard", get(leaderboard))
        .with_state(mock);
    let router = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

/// Server that keys records by string ids and acknowledges writes without
/// echoing the record back.
#[derive(Clone, Default)]
struct Ledger {
    log: Arc<Mutex<Vec<String>>>,
    puts: Arc<Mutex<Vec<Value>>>,
    transaction_status: Arc<Mutex<i64>>,
    role: Arc<Mutex<i64>>,
}

async fn ledger_transaction_get(State(ledger): State<Ledger>, Path(id): Path<String>) -> impl IntoResponse {
    ledger.log.lock().unwrap().push(format!("GET {id}"));
    if id != "007" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "missing"})));
    }
    let status = *ledger.transaction_status.lock().unwrap();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {"id": "007", "userId": 5, "userName": "vy", "totalPayment": 42000, "paymentDate": "2025-09-25T00:00:00", "status": status}
        })),
    )
}

async fn ledger_transaction_put(
    State(ledger): State<Ledger>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    ledger.log.lock().unwrap().push(format!("PUT {id}"));
    if let Some(status) = body["status"].as_i64() {
        *ledger.transaction_status.lock().unwrap() = status;
    }
    ledger.puts.lock().unwrap().push(body);
    Json(json!({"success": true, "message": "Updated"}))
}

async fn ledger_user_get(State(ledger): State<Ledger>, Path(id): Path<String>) -> Json<Value> {
    ledger.log.lock().unwrap().push(format!("GET user {id}"));
    let role = *ledger.role.lock().unwrap();
    Json(json!({"data": {"id": id, "userName": "lan", "email": "lan@x.io", "role": role}}))
}

async fn ledger_role_put(
    State(ledger): State<Ledger>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    ledger.log.lock().unwrap().push(format!("PUT user {id} role"));
    if let Some(role) = body["role"].as_i64() {
        *ledger.role.lock().unwrap() = role;
    }
    Json(json!({"success": true, "message": "Updated"}))
}

async fn spawn_ledger(ledger: Ledger) -> Client {
    let api = Router::new()
        .route("/User/login", post(login))
        .route("/User/{id}", get(ledger_user_get))
        .route("/User/{id}/role", put(ledger_role_put))
        .route(
            "/Transaction/{id}",
            get(ledger_transaction_get).put(ledger_transaction_put),
        )
        .with_state(ledger);
    let router = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    let client = Client::new(&format!("http://{addr}/api"), Session::new()).unwrap();
    client.login("admin@x.io", "secret").await.unwrap();
    client
}

async fn logged_in(mock: Mock) -> Client {
    let base = spawn(mock).await;
    let client = Client::new(&base, Session::new()).unwrap();
    client.login("admin@x.io", "secret").await.unwrap();
    client
}

#[tokio::test]
async fn login_stores_token_used_by_later_requests() {
    let base = spawn(Mock::default()).await;
    let session = Session::new();
    let client = Client::new(&base, session.clone()).unwrap();

    assert!(matches!(client.me().await, Err(ClientError::Unauthorized)));

    let auth = client.login("admin@x.io", "secret").await.unwrap();
    assert_eq!(auth.user.role, Role::Admin);
    assert_eq!(session.token().as_deref(), Some(TOKEN));

    let me = client.me().await.unwrap();
    assert_eq!(me.user_name, "admin");
}

#[tokio::test]
async fn failed_login_leaves_session_empty() {
    let base = spawn(Mock::default()).await;
    let client = Client::new(&base, Session::new()).unwrap();
    let err = client.login("admin@x.io", "wrong").await.unwrap_err();
    assert!(err.is_auth_failure());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn prime_clears_rejected_token() {
    let base = spawn(Mock::default()).await;
    let session = Session::new();
    session.set("stale").unwrap();
    let client = Client::new(&base, session.clone()).unwrap();

    assert!(client.prime().await.is_none());
    assert!(!session.is_authenticated());

    assert!(client.prime().await.is_none());
}

#[tokio::test]
async fn prime_returns_current_user() {
    let client = logged_in(Mock::default()).await;
    let user = client.prime().await.unwrap();
    assert_eq!(user.id, Id::Number(1));
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn logout_clears_session() {
    let client = logged_in(Mock::default()).await;
    client.logout().unwrap();
    assert!(matches!(client.me().await, Err(ClientError::Unauthorized)));
}

#[tokio::test]
async fn users_page_unwraps_paged_envelope() {
    let client = logged_in(Mock::default()).await;
    let page = client.users_page(2, 2).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].role, Role::Staff);
    assert_eq!(page.first_row(), 3);
    assert_eq!(page.last_row(), 4);
    assert!(page.has_previous_page);
}

#[tokio::test]
async fn set_role_and_validation_errors() {
    let client = logged_in(Mock::default()).await;
    let user = client
        .user_set_role(&Id::Number(11), Role::Staff)
        .await
        .unwrap();
    assert_eq!(user.role, Role::Staff);

    let err = client
        .user_set_role(&Id::Number(11), Role::Admin)
        .await
        .unwrap_err();
    match err {
        ClientError::Validation(message) => assert_eq!(message, "unexpected role"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn pending_transaction_is_completed_with_one_put() {
    let mock = Mock::default();
    let client = logged_in(mock.clone()).await;

    let updated = client
        .transaction_set_status(&Id::Number(7), TransactionStatus::Completed, None)
        .await
        .unwrap();
    assert_eq!(updated.status, TransactionStatus::Completed);

    let puts = mock.puts.lock().unwrap().clone();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0]["status"], 1);
    assert_eq!(puts[0]["userName"], "vy");
    assert_eq!(puts[0]["userId"], 3);
    assert_eq!(puts[0]["totalPayment"], 1300000.0);
    assert_eq!(puts[0]["paymentDate"], "2025-09-25T00:00:00");
}

#[tokio::test]
async fn finalized_transaction_is_not_written() {
    let mock = Mock::default();
    *mock.transaction_status.lock().unwrap() = 1;
    let client = logged_in(mock.clone()).await;

    let err = client
        .transaction_set_status(&Id::Number(7), TransactionStatus::Pending, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Engine(EngineError::InvalidTransition {
            from: TransactionStatus::Completed,
            to: TransactionStatus::Pending,
        })
    ));
    assert!(mock.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn status_is_checked_against_fresh_server_state() {
    let mock = Mock::default();
    let client = logged_in(mock.clone()).await;

    let listed = client.transactions_list(1, 50).await.unwrap();
    assert_eq!(listed[0].status, TransactionStatus::Pending);

    // Someone else fails the transaction after the list was loaded.
    *mock.transaction_status.lock().unwrap() = 2;

    let err = client
        .transaction_set_status(
            &wire_id(&listed[0].id),
            TransactionStatus::Cancelled,
            Some("duplicate".to_string()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Engine(_)));
    assert!(mock.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn acknowledged_put_keeps_the_updated_record() {
    let ledger = Ledger::default();
    let client = spawn_ledger(ledger.clone()).await;

    let updated = client
        .transaction_set_status(
            &Id::from("007"),
            TransactionStatus::Completed,
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.id, TransactionId::Text("007".to_string()));
    assert_eq!(updated.status, TransactionStatus::Completed);
    assert_eq!(updated.user_name, "vy");
    assert_eq!(updated.user_id, Some(5));
    assert_eq!(updated.total_payment, 42000.0);

    assert_eq!(*ledger.log.lock().unwrap(), vec!["GET 007", "PUT 007"]);
    let puts = ledger.puts.lock().unwrap().clone();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0]["id"], "007");
    assert_eq!(puts[0]["status"], 1);
}

#[tokio::test]
async fn text_ids_are_fetched_unchanged() {
    let ledger = Ledger::default();
    let client = spawn_ledger(ledger.clone()).await;

    let fetched = client.transaction_get(&Id::from("007")).await.unwrap();
    assert_eq!(fetched.id.to_string(), "007");
    let again = client.transaction_get(&wire_id(&fetched.id)).await.unwrap();
    assert_eq!(again, fetched);
    assert_eq!(*ledger.log.lock().unwrap(), vec!["GET 007", "GET 007"]);
}

#[tokio::test]
async fn acknowledged_role_change_rereads_the_user() {
    let ledger = Ledger::default();
    let client = spawn_ledger(ledger.clone()).await;

    let user = client
        .user_set_role(&Id::from("u-9"), Role::Staff)
        .await
        .unwrap();
    assert_eq!(user.id, Id::Text("u-9".to_string()));
    assert_eq!(user.user_name, "lan");
    assert_eq!(user.role, Role::Staff);
    assert_eq!(
        *ledger.log.lock().unwrap(),
        vec!["PUT user u-9 role", "GET user u-9"]
    );
}

#[tokio::test]
async fn missing_transaction_maps_to_not_found() {
    let client = logged_in(Mock::default()).await;
    let err = client.transaction_get(&Id::Number(99)).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
}

#[tokio::test]
async fn challenge_dates_are_sent_in_utc() {
    let mock = Mock::default();
    let client = logged_in(mock.clone()).await;

    client
        .challenge_create(ChallengeBody {
            name: "Bike to work".to_string(),
            description: "Leave the car at home".to_string(),
            start_date: Some("2025-10-02".to_string()),
            end_date: Some("2025-10-09T18:00:00+07:00".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let posted = mock.posted.lock().unwrap().clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["startDate"], "2025-10-02T00:00:00.000Z");
    assert_eq!(posted[0]["endDate"], "2025-10-09T11:00:00.000Z");
    assert_eq!(posted[0]["isComplete"], false);
}

#[tokio::test]
async fn activities_feed_the_aggregator() {
    let client = logged_in(Mock::default()).await;
    let records = client.activity_records().await.unwrap();
    assert_eq!(records.len(), 3);

    let breakdown = aggregate(&records, "2025-10-02".parse::<DayKey>().unwrap());
    assert_eq!(breakdown.total_raw, 10.0);
    let expected = [
        (Category::Plastic, 40.0),
        (Category::Transportation, 10.0),
        (Category::Energy, 50.0),
        (Category::Food, 0.0),
    ];
    for (category, percent) in expected {
        let got = breakdown.slice(category).percentage;
        assert!((got - percent).abs() < 1e-9, "{category}: {got}");
    }
}

#[tokio::test]
async fn leaderboard_tolerates_nulls() {
    let client = logged_in(Mock::default()).await;
    let rows = client.leaderboard().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].user_name, None);
    assert_eq!(rows[1].total_co2_emission, None);
}
