use std::any::Any;

use axum::{
    http::{StatusCode, Uri},
    response::Response,
};
use minijinja::context;

use crate::error::error_page;

/// Router fallback for paths no route matches.
pub async fn page_not_found(uri: Uri) -> Response {
    error_page(
        StatusCode::NOT_FOUND,
        "misc/404.html",
        context! { path => uri.path() },
    )
}

/// Panic handler: the panic is logged, the visitor gets the 500 page.
pub fn server_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);
    error_page(StatusCode::INTERNAL_SERVER_ERROR, "misc/500.html", context! {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn panic_payloads_render_the_500_page() {
        let payloads: [Box<dyn Any + Send>; 3] = [
            Box::new("boom"),
            Box::new("boom".to_string()),
            Box::new(42_u8),
        ];
        for payload in payloads {
            let response = server_error(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body_text(response).await.contains("Error 500"));
        }
    }

    #[tokio::test]
    async fn panicking_handler_is_caught() {
        async fn explode() -> &'static str {
            panic!("handler blew up")
        }
        let app = Router::new()
            .route("/explode/", get(explode))
            .layer(CatchPanicLayer::custom(server_error));

        let response = app
            .oneshot(Request::get("/explode/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Error 500"));
    }

    #[tokio::test]
    async fn unknown_path_is_404_with_the_path() {
        let response = page_not_found(Uri::from_static("/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("nowhere"));
    }
}
