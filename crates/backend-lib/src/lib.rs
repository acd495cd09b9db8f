// ============================
// shopfront-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `Shopfront` GraphQL server.

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod graphql;
pub mod mail;
pub mod metrics;
pub mod resolvers;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{DefaultAuth, SessionTokens};
use crate::config::Settings;
use crate::graphql::{build_schema, ShopSchema};
use crate::mail::Mailer;
use crate::resolvers::Resolvers;
use crate::storage::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Executable GraphQL schema
    pub schema: ShopSchema,
    /// Operation layer the schema delegates to
    pub resolvers: Resolvers,
    /// Settings manager
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(storage: Arc<dyn Storage>, mailer: Arc<dyn Mailer>, config: Settings) -> Self {
        let settings = Arc::new(config);
        let auth = Arc::new(DefaultAuth::new(SessionTokens::new(&settings.app_secret)));
        let resolvers = Resolvers::new(storage, auth, mailer, settings.clone());
        let schema = build_schema(resolvers.clone());

        Self {
            schema,
            resolvers,
            settings,
        }
    }
}
