//! Connector round trips against a loopback warp server

use intake_connectors::{HttpBackend, HttpBackendConfig};
use intake_core::{
    ContentSuggester, FavoriteSink, Locale, MatchingId, MatchingSource, OfferSink, ProjectId,
    ProjectRegistry, RemoteCallError, RemoteOperation, ResearcherDirectory, ResearcherId,
    SuggestRequest,
};
use intake_test_utils::{complete_draft, init_tracing};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use warp::http::StatusCode;
use warp::Filter;

fn serve<F, R>(routes: F) -> HttpBackend
where
    F: Filter<Extract = (R,), Error = warp::Rejection> + Clone + Send + Sync + 'static,
    R: warp::Reply,
{
    init_tracing();
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    HttpBackend::new(HttpBackendConfig::new(format!("http://{addr}")).with_timeout_ms(2_000))
        .unwrap()
}

/// POST route that records its JSON body and answers with `reply`
fn capture(
    path: &'static str,
    reply: Value,
) -> (
    impl Filter<Extract = (warp::reply::Json,), Error = warp::Rejection> + Clone,
    mpsc::UnboundedReceiver<Value>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let route = warp::post()
        .and(warp::path(path))
        .and(warp::path::end())
        .and(warp::body::json())
        .map(move |body: Value| {
            let _ = tx.send(body);
            warp::reply::json(&reply)
        });
    (route, rx)
}

#[tokio::test]
async fn suggest_content_sends_draft_and_reads_message() {
    let (route, mut bodies) = capture("ai-diagnosis", json!({"message": "「改善された背景」"}));
    let backend = serve(route);

    let deadline = chrono_date(2099, 12, 31);
    let request = SuggestRequest::from_draft(&complete_draft(), Locale::En, deadline);
    let text = backend.suggest_content(&request).await.unwrap();
    assert_eq!(text, "「改善された背景」");

    let body = bodies.recv().await.unwrap();
    assert_eq!(body["project_title"], "次世代電池材料の共同研究");
    assert_eq!(body["application_deadline"], "2099-12-31");
    assert_eq!(body["language"], "en");
    assert_eq!(body["industry_category"], "");
    assert_eq!(body["preferred_researcher_level"], json!(["教授", "准教授"]));
}

#[tokio::test]
async fn register_project_reads_fallback_id() {
    let (route, mut bodies) = capture(
        "project-registration",
        json!({"id": 55, "project_title": "echo", "status": "queued"}),
    );
    let backend = serve(route);

    let registration = backend.register_project(&complete_draft()).await.unwrap();
    assert_eq!(registration.project_id, ProjectId(55));
    assert_eq!(registration.project_title, "echo");
    assert!(registration.researchers.is_empty());
    assert_eq!(registration.payload["status"], "queued");

    let body = bodies.recv().await.unwrap();
    assert_eq!(body["university"], json!(["京都大学", "東京大学"]));
    assert!(body.get("application_deadline").is_none());
}

#[tokio::test]
async fn register_project_without_id_is_decode_error() {
    let (route, _bodies) = capture("project-registration", json!({"ok": true}));
    let backend = serve(route);

    let err = backend.register_project(&complete_draft()).await.unwrap_err();
    assert!(matches!(
        err,
        RemoteCallError::Decode {
            operation: RemoteOperation::RegisterProject,
            ..
        }
    ));
}

#[tokio::test]
async fn fetch_matching_results_passes_query_and_keeps_order() {
    let (tx, mut queries) = mpsc::unbounded_channel();
    let route = warp::get()
        .and(warp::path("matching-results"))
        .and(warp::query::<HashMap<String, String>>())
        .map(move |query: HashMap<String, String>| {
            let _ = tx.send(query);
            warp::reply::json(&json!({
                "project_title": "電池",
                "project_content": "背景",
                "university": ["ALL"],
                "preferred_researcher_level": ["教授"],
                "matched_researchers": [
                    {"matching_id": 3, "favorite_status": true,
                     "researcher_info": {"researcher_id": 30, "researcher_name": "C"}},
                    {"matching_id": 1, "researcher_info": {"researcher_id": 10}},
                    {"matching_id": 2}
                ]
            }))
        });
    let backend = serve(route);

    let results = backend
        .fetch_matching_results(ProjectId(8), Locale::Ja)
        .await
        .unwrap();
    let ids: Vec<_> = results.researchers.iter().map(|r| r.matching_id.0).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(results.project_title, "電池");
    assert!(results.project.universities().is_all());
    assert_eq!(results.researchers[2].researcher_id, ResearcherId(2));

    let query = queries.recv().await.unwrap();
    assert_eq!(query.get("project_id").map(String::as_str), Some("8"));
    assert_eq!(query.get("language").map(String::as_str), Some("ja"));
}

#[tokio::test]
async fn localized_fields_skip_call_for_empty_ids() {
    let (route, mut bodies) = capture(
        "researchers-en",
        json!({"researchers": [{"researcher_id": 30, "researcher_name": "Chiyo"}]}),
    );
    let backend = serve(route);

    assert!(backend.fetch_localized_fields(&[]).await.unwrap().is_empty());

    let dir = backend
        .fetch_localized_fields(&[ResearcherId(30)])
        .await
        .unwrap();
    assert_eq!(dir[&ResearcherId(30)].name.as_deref(), Some("Chiyo"));

    let body = bodies.recv().await.unwrap();
    assert_eq!(body, json!({"researcher_ids": [30]}));
    assert!(bodies.try_recv().is_err());
}

#[tokio::test]
async fn set_favorite_and_send_offer_bodies() {
    let (favorites, mut favorite_bodies) = capture("favorites", json!({"ok": true}));
    let (offers, mut offer_bodies) = capture("offers", json!({"ok": true}));
    let backend = serve(favorites.or(offers));

    backend.set_favorite(MatchingId(11), true).await.unwrap();
    backend
        .send_offer(ProjectId(4), &[ResearcherId(30), ResearcherId(10)])
        .await
        .unwrap();

    assert_eq!(
        favorite_bodies.recv().await.unwrap(),
        json!({"matching_id": 11, "favorite_status": true})
    );
    assert_eq!(
        offer_bodies.recv().await.unwrap(),
        json!({"project_id": 4, "researcher_ids": [30, 10]})
    );
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let route = warp::path("favorites").map(|| {
        warp::reply::with_status("backend down", StatusCode::SERVICE_UNAVAILABLE)
    });
    let backend = serve(route);

    let err = backend.set_favorite(MatchingId(1), false).await.unwrap_err();
    assert_eq!(
        err,
        RemoteCallError::status(RemoteOperation::SetFavorite, 503, "backend down")
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_reply_times_out() {
    init_tracing();
    let route = warp::path("offers").and_then(|| async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok::<_, warp::Rejection>(warp::reply())
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    let backend =
        HttpBackend::new(HttpBackendConfig::new(format!("http://{addr}")).with_timeout_ms(50))
            .unwrap();

    let err = backend
        .send_offer(ProjectId(1), &[ResearcherId(1)])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RemoteCallError::Timeout {
            operation: RemoteOperation::SendOffer,
            after_ms: 50
        }
    );
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let backend =
        HttpBackend::new(HttpBackendConfig::new("http://127.0.0.1:9").with_timeout_ms(2_000))
            .unwrap();
    let err = backend.set_favorite(MatchingId(1), true).await.unwrap_err();
    assert_eq!(err.operation(), RemoteOperation::SetFavorite);
    assert!(matches!(
        err,
        RemoteCallError::Transport { .. } | RemoteCallError::Timeout { .. }
    ));
}

fn chrono_date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
