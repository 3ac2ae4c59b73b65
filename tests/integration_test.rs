// Integration tests for aisearch: real HTTP server, real client, stub model
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpServer};
use aisearch_api::{configure, HttpRelevanceClient};
use aisearch_core::{Catalog, Product, SearchOutcome, SearchSession, SortOption};
use aisearch_relevance::{CompletionProvider, RelevanceService, Result as RelevanceResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct ScriptedModel {
    reply: RelevanceResult<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CompletionProvider for ScriptedModel {
    async fn complete(&self, prompt: &str, temperature: f32) -> RelevanceResult<String> {
        assert_eq!(temperature, 0.0);
        assert!(prompt.contains("```"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

async fn spawn_server(reply: &str) -> (String, ServerHandle, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel {
        reply: Ok(reply.to_string()),
        calls: calls.clone(),
    };
    let service = Arc::new(RelevanceService::new(Arc::new(model)));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .configure(configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), handle, calls)
}

fn catalog() -> Catalog {
    Catalog::new(vec![
        Product::new(1, "Brown Leather Handbag", 55.0)
            .with_category("bags")
            .with_rating(3.2, 40),
        Product::new(2, "Notebook Case", 25.0)
            .with_category("bags")
            .with_rating(4.6, 88),
        Product::new(3, "Cotton T-Shirt", 12.0)
            .with_category("men's clothing")
            .with_rating(4.0, 120),
    ])
}

fn shown(session: &SearchSession) -> Vec<u64> {
    session.display().iter().map(|p| p.id).collect()
}

fn client(base: &str) -> HttpRelevanceClient {
    HttpRelevanceClient::new(base, Duration::from_secs(10)).unwrap()
}

#[actix_web::test]
async fn test_ranked_results_round_trip() {
    let (base, handle, calls) = spawn_server("[2, 1]").await;
    let mut session = SearchSession::new(catalog());

    let outcome = session.search("laptop bag", &client(&base)).await;
    assert_eq!(outcome, SearchOutcome::Applied { matched: 2 });
    assert_eq!(shown(&session), vec![2, 1]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    session.filter_mut().set_sort(SortOption::PriceAsc);
    assert_eq!(shown(&session), vec![2, 1]);
    session.filter_mut().set_sort(SortOption::PriceDesc);
    assert_eq!(shown(&session), vec![1, 2]);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_rating_sort_overrides_relevance() {
    let (base, handle, _) = spawn_server("[1, 3, 2]").await;
    let mut session = SearchSession::new(catalog());

    session.search("something to carry", &client(&base)).await;
    assert_eq!(shown(&session), vec![1, 3, 2]);

    session.filter_mut().set_sort(SortOption::RatingDesc);
    assert_eq!(shown(&session), vec![2, 3, 1]);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_hallucinated_ids_are_dropped() {
    let (base, handle, _) = spawn_server("[404, 3, 1000]").await;
    let mut session = SearchSession::new(catalog());

    let outcome = session.search("t-shirt", &client(&base)).await;
    assert_eq!(outcome, SearchOutcome::Applied { matched: 1 });
    assert_eq!(shown(&session), vec![3]);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_malformed_model_output_leaves_display_unchanged() {
    let (good_base, good_handle, _) = spawn_server("[3]").await;
    let (bad_base, bad_handle, _) = spawn_server("not json").await;
    let mut session = SearchSession::new(catalog());

    session.search("shirt", &client(&good_base)).await;
    assert_eq!(shown(&session), vec![3]);

    let outcome = session.search("bag", &client(&bad_base)).await;
    match outcome {
        SearchOutcome::Failed { reason } => assert!(reason.contains("Invalid AI response format")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(shown(&session), vec![3]);

    good_handle.stop(true).await;
    bad_handle.stop(true).await;
}

#[actix_web::test]
async fn test_blank_query_never_calls_server() {
    let (base, handle, calls) = spawn_server("[1]").await;
    let mut session = SearchSession::new(catalog());
    session.filter_mut().set_price_range(Some(20.0), None).unwrap();

    let outcome = session.search("   ", &client(&base)).await;
    assert_eq!(outcome, SearchOutcome::Reset);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(shown(&session), vec![1, 2]);

    handle.stop(true).await;
}

#[actix_web::test]
async fn test_unreachable_server_is_a_silent_failure() {
    let (base, handle, _) = spawn_server("[1]").await;
    handle.stop(true).await;

    let mut session = SearchSession::new(catalog());
    let outcome = session.search("bag", &client(&base)).await;
    assert!(matches!(outcome, SearchOutcome::Failed { .. }));
    assert_eq!(shown(&session), vec![1, 2, 3]);
}

#[test]
fn test_price_filter_composition() {
    let catalog = Catalog::new(
        [5.0, 10.0, 25.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, &price)| Product::new(i as u64 + 1, format!("item {}", i), price))
            .collect(),
    );
    let mut session = SearchSession::new(catalog);
    let pending = session.begin_search("anything").unwrap();
    session.complete_search(pending.ticket, Ok(vec![4, 3, 2, 1]));

    session.filter_mut().set_price_range(Some(10.0), Some(50.0)).unwrap();
    let prices: Vec<f64> = session.display().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![25.0, 10.0]);
}
