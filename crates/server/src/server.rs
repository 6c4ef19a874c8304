use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{accounts, budgets, categories, ledger, tags, transactions};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Id of the authenticated caller, inserted in the request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

/// `TypedHeader` for the authenticated user id.
///
/// The upstream auth layer forwards the id of the logged-in user in the
/// "x-user-id" entry of the header.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn auth(
    user_header: Option<TypedHeader<UserIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

/// Build the API router. Every route requires the `x-user-id` header.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/{id}", get(accounts::get))
        .route("/categories", post(categories::create).get(categories::list))
        .route(
            "/categories/{id}",
            axum::routing::put(categories::update).delete(categories::delete),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/alerts", get(budgets::alerts))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .put(budgets::update)
                .delete(budgets::delete),
        )
        .route("/tags", post(tags::create).get(tags::list))
        .route("/ledger/recompute", post(ledger::recompute))
        .route_layer(middleware::from_fn(auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
