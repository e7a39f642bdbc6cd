//! HTTP server rendering article pages on demand

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::article::{ArticleWorkflow, RenderOutcome};
use crate::content::ContentStore;
use crate::templates::{TemplateRenderer, STYLESHEET, STYLESHEET_PATH};
use crate::Site;

/// Server state shared by all requests
struct ServerState<S> {
    workflow: ArticleWorkflow<S>,
    renderer: TemplateRenderer,
}

/// A rendered response body
enum Rendered {
    Page(String),
    NotFound {
        html: String,
        robots: Option<&'static str>,
    },
}

impl<S: ContentStore> ServerState<S> {
    fn article(&self, slug: &str) -> Result<Rendered> {
        match self.workflow.render_article(slug)? {
            RenderOutcome::Found(page) => Ok(Rendered::Page(self.renderer.render_article(&page)?)),
            RenderOutcome::NotFound => self.not_found(),
        }
    }

    fn listing(&self) -> Result<Rendered> {
        let articles = self.workflow.list_articles()?;
        let html = self
            .renderer
            .render_listing(&self.workflow.listing_metadata(), &articles)?;
        Ok(Rendered::Page(html))
    }

    fn not_found(&self) -> Result<Rendered> {
        let metadata = self.workflow.not_found_metadata();
        Ok(Rendered::NotFound {
            html: self.renderer.render_not_found(&metadata)?,
            robots: metadata.robots(),
        })
    }
}

/// Build the application router
pub fn router<S: ContentStore + 'static>(
    workflow: ArticleWorkflow<S>,
    public_dir: PathBuf,
) -> Result<Router> {
    let config = workflow.config().clone();
    let renderer = TemplateRenderer::new(&config)?;
    let state = Arc::new(ServerState { workflow, renderer });

    let listing = config.listing_path();
    let prefix = listing.trim_end_matches('/');

    let pages = Router::new()
        .route(prefix, get(listing_handler::<S>))
        .route(&listing, get(listing_handler::<S>))
        .route(&format!("{}/:slug", prefix), get(article_handler::<S>))
        .route(&format!("{}/:slug/", prefix), get(article_handler::<S>))
        .route(STYLESHEET_PATH, get(stylesheet_handler))
        .with_state(state);

    // Links carry the configured root, so pages live under it too
    let root = config.root.trim_matches('/');
    let app = if root.is_empty() {
        pages
    } else {
        Router::new().nest(&format!("/{}", root), pages)
    };

    Ok(app
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http()))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site.workflow()?, site.public_dir.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Server running at http://{}:{}{}",
        ip,
        port,
        crate::helpers::url_for(&site.config, &site.config.listing_path())
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn article_handler<S: ContentStore + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Path(slug): Path<String>,
) -> Response {
    // Store lookups read files, keep them off the async workers
    let rendered = tokio::task::spawn_blocking(move || state.article(&slug)).await;
    respond(rendered)
}

async fn listing_handler<S: ContentStore + 'static>(
    State(state): State<Arc<ServerState<S>>>,
) -> Response {
    let rendered = tokio::task::spawn_blocking(move || state.listing()).await;
    respond(rendered)
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

fn respond(rendered: Result<Result<Rendered>, tokio::task::JoinError>) -> Response {
    match rendered {
        Ok(Ok(Rendered::Page(html))) => Html(html).into_response(),
        Ok(Ok(Rendered::NotFound { html, robots })) => {
            let mut response = (StatusCode::NOT_FOUND, Html(html)).into_response();
            if let Some(robots) = robots {
                response.headers_mut().insert(
                    header::HeaderName::from_static("x-robots-tag"),
                    header::HeaderValue::from_static(robots),
                );
            }
            response
        }
        Ok(Err(e)) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{FixedClock, CATEGORY};
    use crate::config::SiteConfig;
    use crate::content::{ContentError, ContentRecord, ContentResult, Markup, MemoryStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;

    fn app_with(config: SiteConfig) -> Router {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        let soon = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::new()
            .with(
                CATEGORY,
                ContentRecord::new("hello-world", "Hello World", soon)
                    .with_content(Markup::trusted("<p>Coming.</p>")),
            )
            .with(CATEGORY, ContentRecord::new("first", "First", now));
        let workflow = ArticleWorkflow::new(store, config)
            .unwrap()
            .with_clock(FixedClock(now));
        router(workflow, std::env::temp_dir().join("articles-rs-empty-public")).unwrap()
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_article_route() {
        let app = app_with(SiteConfig::default());
        let (status, _, body) = get(app.clone(), "/articles/hello-world").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("UPCOMING"));
        assert!(body.contains("This article will be published on Medium on January 1, 2099"));

        let (status, _, _) = get(app, "/articles/first/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_article_route() {
        let app = app_with(SiteConfig::default());
        let (status, headers, body) = get(app, "/articles/missing-post").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers["x-robots-tag"], "noindex, nofollow");
        assert!(body.contains("Article Not Found"));
    }

    #[tokio::test]
    async fn test_listing_and_stylesheet_routes() {
        let app = app_with(SiteConfig::default());
        let (status, _, body) = get(app.clone(), "/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/articles/hello-world/""#));

        let (status, headers, _) = get(app, "/css/site.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/css; charset=utf-8");
    }

    #[tokio::test]
    async fn test_routes_under_root() {
        let config = SiteConfig {
            root: "/blog/".to_string(),
            ..Default::default()
        };
        let app = app_with(config);
        let (status, _, body) = get(app.clone(), "/blog/articles/first").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/blog/articles/""#));

        let (status, _, _) = get(app, "/articles/first").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_routes_under_custom_articles_dir() {
        let config = SiteConfig {
            articles_dir: "/writing/posts/".to_string(),
            ..Default::default()
        };
        let app = app_with(config);
        let (status, _, body) = get(app.clone(), "/writing/posts/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/writing/posts/first/""#));

        let (status, _, _) = get(app, "/writing/posts/first").await;
        assert_eq!(status, StatusCode::OK);
    }

    struct BrokenStore;

    impl ContentStore for BrokenStore {
        fn get_content_by_slug(&self, _: &str, _: &str) -> ContentResult<Option<ContentRecord>> {
            Err(ContentError::Unavailable("offline".to_string()))
        }

        fn get_all_content_slugs(&self, _: &str) -> ContentResult<Vec<String>> {
            Err(ContentError::Unavailable("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let workflow = ArticleWorkflow::new(BrokenStore, SiteConfig::default()).unwrap();
        let app = router(workflow, std::env::temp_dir()).unwrap();
        let (status, _, _) = get(app, "/articles/anything").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
