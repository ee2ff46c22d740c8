//! In-memory stand-in for the subset of the Gitea API the client uses.
//!
//! Every route requires `Authorization: token <token>`. Repositories belong to
//! the single configured user; deleting or releasing into another owner's
//! repository is forbidden.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const HOST: &str = "http://gitea.mock";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub private: bool,
    pub empty: bool,
    pub default_branch: String,
    pub html_url: String,
    pub clone_url: String,
    pub owner: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    pub author: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateRepoOption {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub auto_init: bool,
}

#[derive(Deserialize)]
pub struct CreateReleaseOption {
    pub tag_name: String,
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// Credentials and identity the mock server accepts.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub token: String,
    pub login: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            token: "mock-token".to_string(),
            login: "mockuser".to_string(),
        }
    }
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    repos: HashMap<String, Repository>,
    releases: HashMap<(String, String), Release>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<MockConfig>,
    user: Arc<User>,
    store: Arc<RwLock<Store>>,
}

type ApiError = (StatusCode, Json<Message>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(Message {
            message: message.into(),
        }),
    )
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let user = User {
        id: 1,
        login: config.login.clone(),
        full_name: format!("{} (mock)", config.login),
        email: format!("{}@gitea.mock", config.login),
    };
    let state = AppState {
        config: Arc::new(config),
        user: Arc::new(user),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/user", get(current_user))
        .route("/user/repos", post(create_repo))
        .route("/repos/{owner}/{repo}", delete(delete_repo))
        .route("/repos/{owner}/{repo}/releases", post(create_release))
        .route("/repos/{owner}/{repo}/releases/tags/{tag}", get(get_release_by_tag))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "token is required"))?;
    if provided != format!("token {}", state.config.token) {
        return Err(api_error(StatusCode::UNAUTHORIZED, "user does not exist or token is invalid"));
    }
    Ok(())
}

fn release_key(owner: &str, repo: &str, tag: &str) -> (String, String) {
    (format!("{owner}/{repo}"), tag.to_string())
}

async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<User>, ApiError> {
    authenticate(&state, &headers)?;
    Ok(Json((*state.user).clone()))
}

async fn create_repo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateRepoOption>,
) -> Result<(StatusCode, Json<Repository>), ApiError> {
    authenticate(&state, &headers)?;
    if input.name.trim().is_empty() {
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "name is required"));
    }

    let full_name = format!("{}/{}", state.user.login, input.name);
    let mut store = state.store.write().await;
    if store.repos.contains_key(&full_name) {
        return Err(api_error(StatusCode::CONFLICT, "the repository with the same name already exists"));
    }
    let repo = Repository {
        id: store.next_id(),
        name: input.name,
        full_name: full_name.clone(),
        description: input.description.unwrap_or_default(),
        private: input.private,
        empty: !input.auto_init,
        default_branch: "main".to_string(),
        html_url: format!("{HOST}/{full_name}"),
        clone_url: format!("{HOST}/{full_name}.git"),
        owner: (*state.user).clone(),
    };
    store.repos.insert(full_name.clone(), repo.clone());
    tracing::info!(repo = %full_name, "repository created");
    Ok((StatusCode::CREATED, Json(repo)))
}

async fn delete_repo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    authenticate(&state, &headers)?;
    if owner != state.user.login {
        return Err(api_error(StatusCode::FORBIDDEN, "you are not the owner of this repository"));
    }

    let full_name = format!("{owner}/{repo}");
    let mut store = state.store.write().await;
    if store.repos.remove(&full_name).is_none() {
        return Err(api_error(StatusCode::NOT_FOUND, "repository not found"));
    }
    store.releases.retain(|(name, _), _| *name != full_name);
    tracing::info!(repo = %full_name, "repository deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn create_release(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
    Json(input): Json<CreateReleaseOption>,
) -> Result<(StatusCode, Json<Release>), ApiError> {
    authenticate(&state, &headers)?;
    let full_name = format!("{owner}/{repo}");
    let mut store = state.store.write().await;
    if !store.repos.contains_key(&full_name) {
        return Err(api_error(StatusCode::NOT_FOUND, "repository not found"));
    }
    if owner != state.user.login {
        return Err(api_error(StatusCode::FORBIDDEN, "you are not the owner of this repository"));
    }
    let key = release_key(&owner, &repo, &input.tag_name);
    if store.releases.contains_key(&key) {
        return Err(api_error(StatusCode::CONFLICT, "release with this tag already exists"));
    }
    let release = Release {
        id: store.next_id(),
        name: input.name.unwrap_or_else(|| input.tag_name.clone()),
        tag_name: input.tag_name,
        body: input.body.unwrap_or_default(),
        draft: input.draft,
        prerelease: input.prerelease,
        author: (*state.user).clone(),
    };
    store.releases.insert(key, release.clone());
    tracing::info!(repo = %full_name, tag = %release.tag_name, "release created");
    Ok((StatusCode::CREATED, Json(release)))
}

async fn get_release_by_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((owner, repo, tag)): Path<(String, String, String)>,
) -> Result<Json<Release>, ApiError> {
    authenticate(&state, &headers)?;
    let store = state.store.read().await;
    store
        .releases
        .get(&release_key(&owner, &repo, &tag))
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "release not found"))
}
