//! Authentication and permission handlers

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::AuthUser;
use crate::services::auth::LoginResponse;
use crate::services::{AuthService, PermissionService};
use crate::AppState;
use shared::models::UserPermissions;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let response = auth_service.login(&body.email, &body.password).await?;
    Ok(Json(response))
}

/// Permissions of the bearer-token holder
pub async fn get_my_permissions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<UserPermissions>> {
    let service = PermissionService::new(state.db.clone());
    Ok(Json(service.user_permissions(user.user_id).await?))
}

pub async fn get_user_permissions(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> AppResult<Json<UserPermissions>> {
    let service = PermissionService::new(state.db.clone());
    Ok(Json(service.user_permissions(user_id).await?))
}
