mod config;
mod document;
mod error;
mod fixture;
mod gateway;
mod loader;
mod models;
mod navigation;
mod progress;
mod registry;
mod render;
mod source;
mod views;

use std::sync::Arc;

use anyhow::Result;

use poem::{
    get, listener::TcpListener, middleware::Compression, Endpoint, EndpointExt, Route, Server,
};

use crate::config::DashboardConfig;
use crate::navigation::Navigator;

fn setup_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();
}

fn app(nav: Arc<Navigator>) -> impl Endpoint {
    Route::new()
        .at("/", get(views::dashboard::root))
        .at("/pages/:page_id", get(views::dashboard::show_page))
        .at("/refresh", get(views::dashboard::refresh))
        .at("/regions/:id", get(views::dashboard::region))
        .data(nav)
        .with(Compression::new())
        .inspect_all_err(|err| {
            tracing::error!("{:?}", err);
        })
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let config = DashboardConfig::from_env()?;
    let nav = Arc::new(Navigator::new(&config)?);
    tracing::info!(
        "Serving {} data on {}",
        nav.loader().source_name(),
        config.listen_addr
    );

    nav.loader().load_page_data("overview").await;
    progress::spawn(nav.document().clone());

    Server::new(TcpListener::bind(config.listen_addr.clone()))
        .run(app(nav))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::{StatusCode, Uri};
    use poem::Request;

    async fn get_body(app: &impl Endpoint, uri: &'static str) -> (StatusCode, String) {
        let resp = app
            .get_response(Request::builder().uri(Uri::from_static(uri)).finish())
            .await;
        let status = resp.status();
        let body = resp.into_body().into_string().await.unwrap();
        (status, body)
    }

    fn fixture_app() -> (Arc<Navigator>, impl Endpoint) {
        let nav = Arc::new(Navigator::new(&DashboardConfig::default()).unwrap());
        (nav.clone(), app(nav))
    }

    #[tokio::test]
    async fn overview_page_shows_fixture_data() {
        let (_, app) = fixture_app();

        let (status, body) = get_body(&app, "/pages/overview").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<span id=\"stat-total-runs\">142</span>"));
        assert!(body.contains("<span id=\"stat-pass-rate\">87%</span>"));
        assert!(body.contains("PASSED"));
        assert!(body.contains("id=\"page-overview\" class=\"page active\""));
    }

    #[tokio::test]
    async fn navigating_switches_active_section() {
        let (nav, app) = fixture_app();

        let (status, body) = get_body(&app, "/pages/deploy").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id=\"page-deploy\" class=\"page active\""));
        assert!(body.contains("id=\"nav-deploy\" class=\"nav-item active\""));
        assert!(body.contains("id=\"page-overview\" class=\"page\""));
        assert_eq!(nav.active_page().await.as_deref(), Some("deploy"));
    }

    #[tokio::test]
    async fn unknown_page_renders_unchanged_dashboard() {
        let (nav, app) = fixture_app();

        let (status, _) = get_body(&app, "/pages/settings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(nav.active_page().await.as_deref(), Some("overview"));
    }

    #[tokio::test]
    async fn refresh_in_fixture_mode_shows_notice() {
        let (_, app) = fixture_app();

        let (status, body) = get_body(&app, "/refresh").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Fixture mode is active."));
    }

    #[tokio::test]
    async fn page_has_no_dangling_asset_links() {
        let (_, app) = fixture_app();

        let (_, body) = get_body(&app, "/").await;
        assert!(!body.contains("/static/"));

        let (status, _) = get_body(&app, "/static/dashboard.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn regions_are_addressable() {
        let (nav, app) = fixture_app();
        nav.loader().load_page_data("overview").await;

        let (status, body) = get_body(&app, "/regions/stat-failed-today").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "3");

        let (status, _) = get_body(&app, "/regions/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
