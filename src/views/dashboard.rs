use std::sync::Arc;

use anyhow::Result;
use poem::http::StatusCode;
use poem::web::{Data, Html, Path};
use poem::{handler, Error};

use crate::navigation::Navigator;
use crate::views::utils::render_dashboard;

#[handler]
pub async fn root(Data(nav): Data<&Arc<Navigator>>) -> Result<Html<String>> {
    render_dashboard(nav, None).await
}

#[handler]
pub async fn show_page(
    Path(page_id): Path<String>,
    Data(nav): Data<&Arc<Navigator>>,
) -> Result<Html<String>> {
    let activated = nav.registry().get(&page_id).map(|targets| targets.nav.clone());
    nav.show_page(&page_id, activated.as_deref()).await;
    render_dashboard(nav, None).await
}

#[handler]
pub async fn refresh(Data(nav): Data<&Arc<Navigator>>) -> Result<Html<String>> {
    let outcome = nav.refresh().await;
    tracing::info!("Refresh: {:?}", outcome);
    render_dashboard(nav, outcome.notice()).await
}

/// Inner markup of a single element, for clients polling one region.
#[handler]
pub async fn region(
    Path(id): Path<String>,
    Data(nav): Data<&Arc<Navigator>>,
) -> poem::Result<Html<String>> {
    let doc = nav.document().lock().await;
    match doc.get(&id) {
        Some(element) => Ok(Html(element.inner_html.clone())),
        None => Err(Error::from_status(StatusCode::NOT_FOUND)),
    }
}
