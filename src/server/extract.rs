use axum::extract::FromRequest;

use crate::error::KanbanError;

/// JSON body extractor whose rejections render as `{error}` with status 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(KanbanError))]
pub struct AppJson<T>(pub T);
