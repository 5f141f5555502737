use askama::Template;
use axum::response::Response;

use crate::error::AppError;
use crate::session::Visitor;
use crate::views::{render, Page};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: Page,
}

pub async fn index(visitor: Visitor) -> Result<Response, AppError> {
    let page = Page::load(&visitor, None).await;
    render(&IndexTemplate { page })
}

pub async fn health_check() -> &'static str {
    "OK"
}
