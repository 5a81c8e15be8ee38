use super::*;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::ItemId,
    error::{ApiError, ErrorCode},
    protocol::{ITEMS_ROUTE, REORDER_ROUTE},
    reorder::reindex,
};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct ServerState {
    items: Arc<Mutex<Vec<Item>>>,
    reject_with: Arc<Mutex<Option<StatusCode>>>,
}

fn abc() -> Vec<Item> {
    vec![
        Item::new("1", "A", 0),
        Item::new("2", "B", 1),
        Item::new("3", "C", 2),
    ]
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

async fn handle_list(State(state): State<ServerState>) -> Json<Vec<Item>> {
    Json(state.items.lock().await.clone())
}

async fn handle_reorder(
    State(state): State<ServerState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, (StatusCode, Json<ApiError>)> {
    if let Some(status) = *state.reject_with.lock().await {
        return Err((
            status,
            Json(ApiError::new(ErrorCode::Internal, "forced failure")),
        ));
    }
    let mut items = state.items.lock().await;
    let reordered = reindex(&items, &req.moved_item_id, req.from_index, req.to_index)
        .map_err(|err| (StatusCode::NOT_FOUND, Json(ApiError::from(err))))?;
    *items = reordered.clone();
    Ok(Json(ReorderResponse::success(reordered)))
}

async fn spawn_items_server(items: Vec<Item>) -> std::io::Result<(String, ServerState)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState {
        items: Arc::new(Mutex::new(items)),
        reject_with: Arc::new(Mutex::new(None)),
    };
    let app = Router::new()
        .route(ITEMS_ROUTE, get(handle_list))
        .route(REORDER_ROUTE, post(handle_reorder))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

struct UnreachableApi;

#[async_trait]
impl ItemsApi for UnreachableApi {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        Err(ClientError::UnexpectedResponse {
            status: 502,
            body: "bad gateway".into(),
        })
    }

    async fn reorder(&self, _request: &ReorderRequest) -> Result<ReorderResponse, ClientError> {
        Err(ClientError::UnexpectedResponse {
            status: 502,
            body: "bad gateway".into(),
        })
    }
}

#[test]
fn begin_move_applies_locally_and_remembers_snapshot() {
    let mut list = OptimisticList::new(abc());
    let request = list
        .begin_move(&"1".into(), 2)
        .expect("move")
        .expect("request");

    assert_eq!(request, ReorderRequest::new("1", 0, 2));
    assert_eq!(ids(list.items()), ["2", "3", "1"]);
    assert!(list.is_syncing());

    assert!(list.rollback());
    assert_eq!(list.items(), abc().as_slice());
    assert!(!list.is_syncing());
    assert!(!list.rollback());
}

#[test]
fn moving_onto_current_position_sends_nothing() {
    let mut list = OptimisticList::new(abc());
    assert_eq!(list.begin_move(&"2".into(), 1).expect("move"), None);
    assert!(!list.is_syncing());
}

#[test]
fn second_move_waits_for_first_to_settle() {
    let mut list = OptimisticList::new(abc());
    list.begin_move(&"3".into(), 0).expect("first");
    assert_eq!(
        list.begin_move(&"1".into(), 2),
        Err(ListError::SyncInProgress)
    );

    list.confirm(Vec::new());
    assert_eq!(ids(list.items()), ["3", "1", "2"]);
    assert!(list.begin_move(&"1".into(), 2).expect("second").is_some());
}

#[test]
fn unknown_item_cannot_be_moved() {
    let mut list = OptimisticList::new(abc());
    assert!(matches!(
        list.begin_move(&"9".into(), 0),
        Err(ListError::Reindex(_))
    ));
}

#[test]
fn new_list_sorts_by_rank() {
    let mut items = abc();
    items.reverse();
    let list = OptimisticList::new(items);
    assert_eq!(ids(list.items()), ["1", "2", "3"]);
    assert_eq!(list.index_of(&ItemId::from("3")), Some(2));
}

#[test]
fn rejects_invalid_server_url() {
    assert!(matches!(
        HttpItemsClient::new("not a url"),
        Err(ClientError::InvalidUrl { .. })
    ));
}

#[test]
fn base_url_keeps_path_prefix() {
    let client = HttpItemsClient::new("http://localhost:3001/api").expect("client");
    assert_eq!(client.base_url().as_str(), "http://localhost:3001/api/");
}

#[tokio::test]
async fn lists_and_reorders_over_http() {
    let (server_url, state) = spawn_items_server(abc()).await.expect("spawn server");
    let client = HttpItemsClient::new(&server_url).expect("client");

    let items = client.list_items().await.expect("list");
    assert_eq!(items, abc());

    let response = client
        .reorder(&ReorderRequest::new("3", 2, 0))
        .await
        .expect("reorder");
    assert_eq!(response.message, "Success");
    assert_eq!(ids(&response.items), ["3", "1", "2"]);
    assert_eq!(*state.items.lock().await, response.items);
}

#[tokio::test]
async fn server_errors_decode_into_api_errors() {
    let (server_url, _state) = spawn_items_server(abc()).await.expect("spawn server");
    let client = HttpItemsClient::new(&server_url).expect("client");

    let err = client
        .reorder(&ReorderRequest::new("missing", 0, 1))
        .await
        .expect_err("unknown id");
    match err {
        ClientError::Api { status, error } => {
            assert_eq!(status, 404);
            assert_eq!(error.code, ErrorCode::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn drag_end_syncs_with_server() {
    let (server_url, state) = spawn_items_server(abc()).await.expect("spawn server");
    let client = HttpItemsClient::new(&server_url).expect("client");
    let mut list = OptimisticList::new(client.list_items().await.expect("list"));

    let outcome = drag_end(&client, &mut list, &"1".into(), Some(&"3".into()))
        .await
        .expect("drag");
    assert!(matches!(outcome, DragOutcome::Synced));
    assert_eq!(ids(list.items()), ["2", "3", "1"]);
    assert_eq!(*state.items.lock().await, list.items());
}

#[tokio::test]
async fn drag_end_rolls_back_when_server_fails() {
    let (server_url, state) = spawn_items_server(abc()).await.expect("spawn server");
    *state.reject_with.lock().await = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let client = HttpItemsClient::new(&server_url).expect("client");
    let mut list = OptimisticList::new(abc());

    let outcome = drag_end(&client, &mut list, &"3".into(), Some(&"1".into()))
        .await
        .expect("drag");
    match outcome {
        DragOutcome::RolledBack(err) => assert_eq!(err.code(), Some(ErrorCode::Internal)),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(list.items(), abc().as_slice());
    assert!(!list.is_syncing());
}

#[tokio::test]
async fn drag_end_rolls_back_on_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpItemsClient::new(&format!("http://{addr}")).expect("client");
    let mut list = OptimisticList::new(abc());

    let outcome = drag_end(&client, &mut list, &"2".into(), Some(&"3".into()))
        .await
        .expect("drag");
    assert!(matches!(
        outcome,
        DragOutcome::RolledBack(ClientError::Transport(_))
    ));
    assert_eq!(list.items(), abc().as_slice());
}

#[tokio::test]
async fn drag_end_ignores_drops_without_target_or_onto_self() {
    let mut list = OptimisticList::new(abc());
    let api = UnreachableApi;

    let outcome = drag_end(&api, &mut list, &"1".into(), None)
        .await
        .expect("drag");
    assert!(matches!(outcome, DragOutcome::Ignored));

    let outcome = drag_end(&api, &mut list, &"1".into(), Some(&"1".into()))
        .await
        .expect("drag");
    assert!(matches!(outcome, DragOutcome::Ignored));
    assert_eq!(list.items(), abc().as_slice());
}

#[tokio::test]
async fn drag_end_reports_failures_from_any_api() {
    let mut list = OptimisticList::new(abc());
    let outcome = drag_end(&UnreachableApi, &mut list, &"1".into(), Some(&"2".into()))
        .await
        .expect("drag");
    assert!(matches!(
        outcome,
        DragOutcome::RolledBack(ClientError::UnexpectedResponse { status: 502, .. })
    ));
    assert_eq!(list.items(), abc().as_slice());
}
