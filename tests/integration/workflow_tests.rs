//! Page workflows driven through the real client

use std::sync::Arc;
use std::time::Duration;

use libdesk::{
    config::ApiConfig,
    models::{BookType, RequestStatus, SearchForm},
    services::{
        catalog::{CatalogCriteria, CatalogView},
        dispatcher::{ActionOutcome, DeskAction, RequestDispatcher},
        requests::{RequestCriteria, RequestsView},
        search::{SearchOutcome, SearchOverlay, SearchView},
        Notice,
    },
    ApiClient,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client_for;

fn query(text: &str) -> SearchForm {
    SearchForm {
        query: text.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_catalog_load_then_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Algebra", "bookType": "Module", "strand": "STEM", "level": "11",
             "cover": "algebra.png"},
            {"id": 2, "title": "Dune", "bookType": "Novel", "genre": "SciFi",
             "cover": "/static/dune.jpg"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CatalogView::new(client.endpoints().clone());
    view.load(&client).await.unwrap();

    let page = view.render();
    assert_eq!(page.cards.len(), 2);
    assert_eq!(
        page.cards[0].cover_url.as_deref(),
        Some(format!("{}/api/databasecontent/cover/algebra.png", server.uri()).as_str())
    );
    assert_eq!(page.cards[1].cover_url.as_deref(), Some("static/dune.jpg"));

    // Genre does not classify modules, so it alone keeps both
    view.apply(CatalogCriteria {
        genre: Some("SciFi".to_string()),
        ..Default::default()
    });
    assert_eq!(view.filtered().len(), 2);

    view.apply(CatalogCriteria {
        book_type: Some(BookType::Novel),
        genre: Some("SciFi".to_string()),
        ..Default::default()
    });
    let ids: Vec<i64> = view.filtered().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_catalog_server_error_keeps_page_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CatalogView::new(client.endpoints().clone());
    assert!(view.load(&client).await.is_err());

    let page = view.render();
    assert!(page.cards.is_empty());
    assert_eq!(page.error.as_deref(), Some("Failed to load books. Please try again later."));
}

#[tokio::test]
async fn test_details_survive_failed_catalog_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 2, "title": "Dune", "bookType": "Novel", "genre": "SciFi", "description": "Desert planet"}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CatalogView::new(client.endpoints().clone());
    assert!(view.load(&client).await.is_err());

    let book = view.details(&client, 2).await.unwrap();
    assert_eq!(book.description.as_deref(), Some("Desert planet"));
    assert!(view.details(&client, 99).await.is_err());
}

#[tokio::test]
async fn test_approve_reloads_request_list() {
    let server = MockServer::start().await;
    // First load sees the pending request, the reload sees it approved
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "book_title": "Dune", "user_name": "Ana", "user_email": "ana@school.edu",
             "grade_level": "10", "section": "B", "book_status": "pending"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "book_title": "Dune", "user_name": "Ana", "user_email": "ana@school.edu",
             "grade_level": "10", "section": "B", "book_status": "approved",
             "borrow_date": "2024-03-01T08:00:00Z", "return_date": "2024-03-15T08:00:00Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/5/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "approved"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = RequestsView::new(client.endpoints().clone());
    view.load(&client).await.unwrap();
    view.apply(RequestCriteria {
        text: "ana".to_string(),
        status: Some(RequestStatus::Pending),
    });
    assert_eq!(view.filtered().len(), 1);

    let yes = |_: &str| true;
    let dispatcher = RequestDispatcher::new(&client, &yes);
    let outcome = dispatcher.dispatch(DeskAction::Approve(5), &mut view).await;
    assert_eq!(
        outcome,
        ActionOutcome::Applied {
            notice: Notice::success("Request approved successfully"),
            reload_error: None,
        }
    );

    let table = view.render();
    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.status_label, "Approved");
    assert_eq!(row.grade_section, "10 - B");
    assert_eq!(row.borrow_date, "2024-03-01");
    assert_eq!(row.return_date, "2024-03-15");
    assert_eq!(row.actions.len(), 1);
    assert_eq!(row.actions[0].label, "Mark Returned");
}

#[tokio::test]
async fn test_search_renders_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [
                {"id": 2, "title": "Dune", "author": "Frank Herbert", "quantity": 0,
                 "bookType": "Novel", "genre": "SciFi"}
            ],
            "total": 1
        })))
        .mount(&server)
        .await;

    let overlay = SearchOverlay::new(Arc::new(client_for(&server)));
    let SearchOutcome::Rendered(SearchView::Results { header, cards }) = overlay.submit(&query("dune")).await
    else {
        panic!("expected results");
    };
    assert_eq!(header, "Found 1 book(s)");
    assert_eq!(cards[0].initial, 'D');
    assert_eq!(cards[0].byline, "by Frank Herbert");
    assert_eq!(cards[0].availability.label(), "Not Available");
}

#[tokio::test]
async fn test_concurrent_search_is_suppressed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"books": [], "total": 0, "message": "Nothing matched"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let overlay = Arc::new(SearchOverlay::new(Arc::new(client_for(&server))));
    let (dune, algebra) = (query("dune"), query("algebra"));
    let (first, second) = tokio::join!(overlay.submit(&dune), overlay.submit(&algebra));

    assert_eq!(second, SearchOutcome::Suppressed);
    assert_eq!(
        first,
        SearchOutcome::Rendered(SearchView::Empty {
            message: "Nothing matched".to_string(),
            hint: "Try different keywords or check your spelling",
        })
    );
    assert!(!overlay.is_searching());
}

#[tokio::test]
async fn test_blank_search_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let overlay = SearchOverlay::new(Arc::new(client_for(&server)));
    assert_eq!(
        overlay.submit(&query("   ")).await,
        SearchOutcome::Rendered(SearchView::Error {
            message: "Please enter a search term".to_string(),
        })
    );
}

#[tokio::test]
async fn test_slow_search_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"books": [], "total": 0}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let overlay = SearchOverlay::new(Arc::new(client_for(&server)));
    assert_eq!(
        overlay.submit(&query("dune")).await,
        SearchOutcome::Rendered(SearchView::Error {
            message: "Request timed out. Please try again.".to_string(),
        })
    );
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Nothing listens on port 1
    let config = ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    };
    let overlay = SearchOverlay::new(Arc::new(ApiClient::new(&config).unwrap()));

    assert!(overlay.check_backend_health().await.is_none());
    assert_eq!(
        overlay.submit(&query("dune")).await,
        SearchOutcome::Rendered(SearchView::Error {
            message: "Cannot connect to server. Please check if the backend is running.".to_string(),
        })
    );
}
