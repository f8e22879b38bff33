//! HTTP boundary tests: paths, methods, cookies and error bodies

use libdesk::{
    models::{BookKind, BookType, BookUpdate, RequestAction, RequestStatus, SearchCriteria, SearchForm},
    AppError, LibraryApi,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{client_for, SESSION};

#[tokio::test]
async fn test_list_books_sends_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("cookie", SESSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Algebra", "bookType": "Module", "strand": "STEM", "level": 11, "qtr": "qtr1"},
            {"id": 2, "title": "Dune", "bookType": "Novel", "genre": "SciFi", "author": "Frank Herbert"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let books = assert_ok!(client_for(&server).list_books().await);
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].kind.strand(), Some("STEM"));
    assert_eq!(books[0].kind.level(), Some("11"));
    assert!(matches!(books[1].kind, BookKind::Novel { .. }));
}

#[tokio::test]
async fn test_refreshed_session_cookie_is_sent_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(header("cookie", SESSION))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=refreshed; Path=/")
                .set_body_json(json!({"status": "ok", "search_engine_available": true})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("cookie", "session=refreshed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_ok!(client.health().await);
    let books = assert_ok!(client.list_books().await);
    assert!(books.is_empty());
}

#[tokio::test]
async fn test_get_book_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Book not found"})))
        .mount(&server)
        .await;

    let err = assert_err!(client_for(&server).get_book(42).await);
    assert!(matches!(err, AppError::Http { status: 404, .. }));
    assert_eq!(err.server_message(), Some("Book not found"));
}

#[tokio::test]
async fn test_null_request_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let requests = assert_ok!(client_for(&server).list_requests().await);
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_request_list_keeps_unknown_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "book_title": "Dune", "user_name": "Ana", "user_email": "ana@school.edu",
             "book_status": "lost", "borrow_date": "2024-03-01T08:00:00Z", "return_date": null}
        ])))
        .mount(&server)
        .await;

    let requests = assert_ok!(client_for(&server).list_requests().await);
    assert_eq!(requests[0].book_status, RequestStatus::Other("lost".to_string()));
    assert!(requests[0].book_status.actions().is_empty());
}

#[tokio::test]
async fn test_request_actions_hit_their_paths() {
    let server = MockServer::start().await;
    for action in ["approve", "reject", "return"] {
        Mock::given(method("PUT"))
            .and(path(format!("/api/admin/requests/7/{}", action)))
            .and(header("cookie", SESSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    for action in [RequestAction::Approve, RequestAction::Reject, RequestAction::Return] {
        assert_ok!(client.update_request(7, action).await);
    }
}

#[tokio::test]
async fn test_conflict_message_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/7/approve"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Book not available"})))
        .mount(&server)
        .await;

    let err = assert_err!(client_for(&server).update_request(7, RequestAction::Approve).await);
    assert_eq!(err.user_message("Failed to approve request"), "Book not available");
}

#[tokio::test]
async fn test_error_without_json_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/requests/7/reject"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = assert_err!(client_for(&server).update_request(7, RequestAction::Reject).await);
    assert!(matches!(err, AppError::Http { status: 500, message: None }));
    assert_eq!(err.user_message("Failed to reject request"), "Failed to reject request");
}

#[tokio::test]
async fn test_check_due_returns_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/requests/check-due"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Updated 2 overdue requests"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = assert_ok!(client_for(&server).check_due().await);
    assert_eq!(message, "Updated 2 overdue requests");
}

#[tokio::test]
async fn test_search_sends_only_set_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "dune"))
        .and(query_param("author", "Herbert"))
        .and(query_param("available", "true"))
        .and(query_param_is_missing("category"))
        .and(query_param_is_missing("year"))
        .and(query_param_is_missing("exact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [{"id": 2, "title": "Dune", "quantity": "3", "bookType": "Novel"}],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = SearchForm {
        query: "  dune ".to_string(),
        author: "Herbert".to_string(),
        available_only: true,
        ..Default::default()
    };
    let criteria = assert_ok!(SearchCriteria::try_from(&form));
    let response = assert_ok!(client_for(&server).search(&criteria).await);
    assert_eq!(response.total, 1);
    assert_eq!(response.books[0].quantity, 3);
}

#[tokio::test]
async fn test_health_reports_search_engine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok", "search_engine_available": false})),
        )
        .mount(&server)
        .await;

    let health = assert_ok!(client_for(&server).health().await);
    assert_eq!(health.status.as_deref(), Some("ok"));
    assert!(!health.search_engine_available);
}

#[tokio::test]
async fn test_update_book_sends_full_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/admin/books/2"))
        .and(body_json(json!({
            "title": "Dune",
            "description": "",
            "quantity": 5,
            "publisher": "Ace",
            "bookType": "Novel",
            "level": "",
            "strand": "",
            "qtr": "",
            "genre": "SciFi",
            "author": "Frank Herbert",
            "link": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    let update = BookUpdate {
        title: "Dune".to_string(),
        description: String::new(),
        quantity: 5,
        publisher: "Ace".to_string(),
        book_type: BookType::Novel,
        level: String::new(),
        strand: String::new(),
        qtr: String::new(),
        genre: "SciFi".to_string(),
        author: "Frank Herbert".to_string(),
        link: String::new(),
    };
    assert_ok!(client_for(&server).update_book(2, &update).await);
}

#[tokio::test]
async fn test_logout_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client_for(&server).logout().await);
}
