//! Local feed server
//!
//! Serves the feed page and applies the composer, favorite and delete forms
//! to one shared session. Both sources are read again before every request,
//! so edits to the document or posts made from the CLI show up on refresh.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tower_http::trace::TraceLayer;

use crate::content::loader::{assemble, load_document};
use crate::content::{PostId, Storage};
use crate::error::FeedError;
use crate::filter::MonthFilter;
use crate::helpers::feed_page;
use crate::session::FeedSession;
use crate::Feed;

/// Server state
struct ServerState<S> {
    feed: Feed,
    session: Mutex<FeedSession<S>>,
}

impl<S: Storage> ServerState<S> {
    /// Lock the session after refreshing it from both sources
    ///
    /// The active month and session-only favorites survive the refresh.
    async fn fresh_session(&self) -> MutexGuard<'_, FeedSession<S>> {
        let markdown = load_document(&self.feed.document_path, &self.feed.parser()).await;
        let mut session = self.session.lock().await;
        let local = session.store().load_all();
        session.reload(assemble(local, markdown));
        session
    }
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewPost {
    content: String,
}

#[derive(Debug, Deserialize)]
struct DeleteForm {
    #[serde(default)]
    confirm: String,
}

/// Build the router over a session opened from `feed`
pub fn router<S>(feed: Feed, session: FeedSession<S>) -> Router
where
    S: Storage + Send + 'static,
{
    let state = Arc::new(ServerState {
        feed,
        session: Mutex::new(session),
    });

    Router::new()
        .route("/", get(index_handler::<S>))
        .route("/posts", post(create_handler::<S>))
        .route("/posts/:id/favorite", post(favorite_handler::<S>))
        .route("/posts/:id/delete", post(delete_handler::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the feed server
pub async fn start(feed: &Feed, ip: &str, port: u16) -> Result<()> {
    let session = feed.open_session().await;
    let app = router(feed.clone(), session);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler<S: Storage + Send + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Query(query): Query<FeedQuery>,
) -> Response {
    let filter = match query.month.as_deref().unwrap_or("all").parse::<MonthFilter>() {
        Ok(filter) => filter,
        Err(e) => return error_response(e),
    };

    let mut session = state.fresh_session().await;
    session.select(filter);
    Html(feed_page(&session, &state.feed.config)).into_response()
}

async fn create_handler<S: Storage + Send + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Form(form): Form<NewPost>,
) -> Response {
    let mut session = state.fresh_session().await;
    match session.submit(&form.content, &state.feed.config.author, chrono::Utc::now(), &mut ()) {
        Ok(_) => back_to_feed(&session),
        Err(e) => error_response(e),
    }
}

async fn favorite_handler<S: Storage + Send + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Path(id): Path<String>,
) -> Response {
    let id = parse_id(&id);
    let mut session = state.fresh_session().await;
    match session.toggle_favorite(&id) {
        Ok(_) => back_to_feed(&session),
        Err(e) => error_response(e),
    }
}

async fn delete_handler<S: Storage + Send + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Response {
    let id = parse_id(&id);
    let confirmed = form.confirm == "yes";
    let mut session = state.fresh_session().await;
    match session.delete(&id, &mut |_: &str| confirmed, &mut ()) {
        Ok(_) => back_to_feed(&session),
        Err(e) => error_response(e),
    }
}

fn parse_id(raw: &str) -> PostId {
    match raw.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

/// Redirect to the feed, keeping the active month
fn back_to_feed<S: Storage>(session: &FeedSession<S>) -> Response {
    Redirect::to(&format!("/?month={}", session.active_filter())).into_response()
}

fn error_response(err: FeedError) -> Response {
    let status = match &err {
        FeedError::PostNotFound(_) => StatusCode::NOT_FOUND,
        FeedError::ReadOnlyPost(_) => StatusCode::FORBIDDEN,
        FeedError::EmptyPost | FeedError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, err.to_string()).into_response()
}
