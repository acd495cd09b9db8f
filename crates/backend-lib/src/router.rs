// ============================
// crates/backend-lib/src/router.rs
// ============================
/** HTTP router for the `Shopfront` server.
Serves the GraphQL endpoint, turns the session cookie into a
`RequestContext` for each request, and writes back any cookie change the
resolvers asked for. */
use crate::{
    config::{CookieSettings, Settings},
    context::{RequestContext, SessionUpdate},
    error::AppError,
    metrics::GRAPHQL_REQUEST,
    AppState,
};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use metrics::counter;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Session cookie lifetime, matching the token's own expiry
const COOKIE_MAX_AGE: time::Duration = time::Duration::days(365);

/// Create the HTTP router
pub fn create_router(state: Arc<AppState>) -> Result<Router, AppError> {
    let mut graphql = post(graphql_handler);
    if state.settings.graphiql {
        graphql = graphql.get(graphiql_handler);
    }

    Ok(Router::new()
        .route("/graphql", graphql)
        .route("/health", get(health_handler))
        .layer(cors_layer(&state.settings)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Only the storefront may call us with credentials
fn cors_layer(settings: &Settings) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(settings.frontend_url.trim_end_matches('/'))
        .map_err(|e| AppError::Internal(format!("invalid frontend_url: {e}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "Healthy"
}

async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Execute one GraphQL request on behalf of the cookie's owner
async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: GraphQLRequest,
) -> Result<(CookieJar, GraphQLResponse), AppError> {
    let token = jar
        .get(&state.settings.cookie.name)
        .map(|cookie| cookie.value().to_owned());

    let ctx = Arc::new(
        RequestContext::resolve(
            token.as_deref(),
            state.resolvers.auth(),
            state.resolvers.storage(),
        )
        .await?,
    );
    counter!(GRAPHQL_REQUEST).increment(1);

    let response = state
        .schema
        .execute(request.into_inner().data(ctx.clone()))
        .await;

    let jar = apply_session(jar, &state.settings.cookie, ctx.session().take());
    Ok((jar, response.into()))
}

/// Write the resolvers' requested session change onto the cookie jar
fn apply_session(
    jar: CookieJar,
    settings: &CookieSettings,
    update: Option<SessionUpdate>,
) -> CookieJar {
    match update {
        Some(SessionUpdate::Set(token)) => jar.add(
            Cookie::build((settings.name.clone(), token))
                .http_only(true)
                .path("/")
                .max_age(COOKIE_MAX_AGE)
                .same_site(SameSite::Lax)
                .secure(settings.secure),
        ),
        Some(SessionUpdate::Clear) => {
            jar.remove(Cookie::build((settings.name.clone(), "")).path("/"))
        },
        None => jar,
    }
}
