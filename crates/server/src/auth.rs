//! `X-API-Key` authentication middleware.
//!
//! Each protected route group is layered with one of the tier checks below.
//! A missing or unknown key is a 401; a known key below the required tier is
//! a 403. The resolved role is stored in request extensions for handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sea_orm::DatabaseConnection;

use service::auth::{ApiKeyStore, Role};
use service::storage::StorageRoot;

use crate::errors::ApiError;

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub storage: StorageRoot,
    pub keys: Arc<ApiKeyStore>,
}

async fn require_role(
    state: ServerState,
    min_role: Role,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let role = state.keys.role_for(key).ok_or(ApiError::Unauthorized)?;
    if role < min_role {
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(role);
    Ok(next.run(req).await)
}

pub async fn require_viewer(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(state, Role::Viewer, req, next).await
}

pub async fn require_editor(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(state, Role::Editor, req, next).await
}

pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(state, Role::Admin, req, next).await
}
