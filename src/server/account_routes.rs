use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::state::{GuardedAccountManager, ServerState};
use crate::error::CatalogResult;
use crate::user::{Account, AccountUpdate};

#[derive(Deserialize, Debug)]
struct RegisterBody {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Default)]
struct UpdateAccountBody {
    pub display_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct AccountsResponse {
    accounts: Vec<Account>,
}

async fn register(
    State(manager): State<GuardedAccountManager>,
    Json(body): Json<RegisterBody>,
) -> CatalogResult<impl IntoResponse> {
    let account = manager.register(&body.email, &body.display_name, &body.password)?;
    Ok((StatusCode::CREATED, Json(account)))
}

async fn login(
    State(manager): State<GuardedAccountManager>,
    Json(body): Json<LoginBody>,
) -> CatalogResult<Json<Account>> {
    Ok(Json(manager.login(&body.email, &body.password)?))
}

async fn list_accounts(
    State(manager): State<GuardedAccountManager>,
) -> CatalogResult<Json<AccountsResponse>> {
    Ok(Json(AccountsResponse {
        accounts: manager.list_accounts()?,
    }))
}

async fn get_account(
    State(manager): State<GuardedAccountManager>,
    Path(email): Path<String>,
) -> CatalogResult<Json<Account>> {
    Ok(Json(manager.get_account(&email)?))
}

async fn update_account(
    State(manager): State<GuardedAccountManager>,
    Path(email): Path<String>,
    Json(body): Json<UpdateAccountBody>,
) -> CatalogResult<Json<Account>> {
    let update = AccountUpdate {
        display_name: body.display_name,
        password: body.password,
    };
    Ok(Json(manager.update_account(&email, update)?))
}

async fn delete_account(
    State(manager): State<GuardedAccountManager>,
    Path(email): Path<String>,
) -> CatalogResult<StatusCode> {
    manager.delete_account(&email)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}

pub fn make_account_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_accounts))
        .route(
            "/{email}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .with_state(state)
}
