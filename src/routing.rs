//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    dashboard::get_dashboard_page,
    endpoints,
    live::get_live_transactions,
    log_in::{get_log_in_page, post_log_in, post_log_in_guest},
    log_out::get_log_out,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        reorder_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_IN_GUEST, post(post_log_in_guest))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes need to use the HX-Redirect header for auth redirects to
    // work properly for HTMX requests. The live stream sits here too: it is
    // only ever opened by the dashboard page, never by browser navigation.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
            .route(
                endpoints::TRANSACTION,
                put(update_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::REORDER_TRANSACTIONS,
                post(reorder_transactions_endpoint),
            )
            .route(endpoints::LIVE_TRANSACTIONS, get(get_live_transactions))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database.");
        let state = AppState::new(connection, "42", "Asia/Jakarta")
            .expect("Could not create app state.");
        let app = build_router(state);

        TestServer::builder()
            .save_cookies()
            .build(app)
            .expect("Could not create test server.")
    }

    async fn sign_in(server: &TestServer, name: &str) {
        let response = server
            .post(endpoints::LOG_IN)
            .form(&[("name", name)])
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn root_redirects_signed_out_visitors_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        let response = server.get(endpoints::COFFEE).await;

        response.assert_status(axum::http::StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_path_falls_back_to_404() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
        response.assert_text_contains("404");
    }

    #[tokio::test]
    async fn signed_in_visitor_sees_the_dashboard() {
        let server = get_test_server();
        sign_in(&server, "Budi").await;

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Total Saldo");
        response.assert_text_contains("Budi");
    }

    #[tokio::test]
    async fn create_round_trip_shows_the_transaction() {
        let server = get_test_server();
        sign_in(&server, "Budi").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .form(&[
                ("description", "Kopi"),
                ("amount", "20000"),
                ("type", "expense"),
                ("method", "cash"),
            ])
            .await;
        response.assert_status_ok();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        let document = Html::parse_document(&response.text());
        let row_selector = Selector::parse("#transaction-list li").unwrap();
        let rows: Vec<_> = document.select(&row_selector).collect();

        assert_eq!(rows.len(), 1);
        let row_text = rows[0].text().collect::<String>();
        assert!(row_text.contains("Kopi"));
        assert!(row_text.contains("Rp20.000"));
        assert!(row_text.contains("oleh Budi"));
    }

    #[tokio::test]
    async fn reorder_round_trip_persists_the_new_order() {
        let server = get_test_server();
        sign_in(&server, "Budi").await;

        for description in ["pertama", "kedua", "ketiga"] {
            let response = server
                .post(endpoints::TRANSACTIONS)
                .form(&[
                    ("description", description),
                    ("amount", "10000"),
                    ("type", "expense"),
                    ("method", "cash"),
                ])
                .await;
            response.assert_status_ok();
        }

        let row_selector = Selector::parse("#transaction-list li").unwrap();
        let row_ids = |text: &str| -> Vec<String> {
            Html::parse_document(text)
                .select(&row_selector)
                .map(|row| row.value().attr("data-id").unwrap().to_owned())
                .collect()
        };

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        let mut ids = row_ids(&response.text());
        ids.reverse();

        // The ID sequence is submitted as repeated form fields, the way the
        // drag handler posts it.
        let pairs: Vec<(&str, &str)> = ids.iter().map(|id| ("id", id.as_str())).collect();
        let body = serde_urlencoded::to_string(&pairs).unwrap();

        let response = server
            .post(endpoints::REORDER_TRANSACTIONS)
            .text(body)
            .content_type("application/x-www-form-urlencoded")
            .await;
        response.assert_status_ok();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        assert_eq!(row_ids(&response.text()), ids);
    }

    #[tokio::test]
    async fn invalid_submission_leaves_the_dashboard_empty() {
        let server = get_test_server();
        sign_in(&server, "Budi").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .form(&[
                ("description", "   "),
                ("amount", "20000"),
                ("type", "expense"),
                ("method", "cash"),
            ])
            .await;
        response.assert_status_bad_request();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_text_contains("Belum ada transaksi tersimpan.");
    }

    #[tokio::test]
    async fn mutations_without_a_session_get_an_hx_redirect() {
        let server = get_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS)
            .form(&[
                ("description", "Kopi"),
                ("amount", "20000"),
                ("type", "expense"),
                ("method", "cash"),
            ])
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn signing_out_locks_the_dashboard_again() {
        let server = get_test_server();
        sign_in(&server, "Budi").await;

        let response = server.get(endpoints::LOG_OUT).await;
        response.assert_status_see_other();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;
        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }
}
