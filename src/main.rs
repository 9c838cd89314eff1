#[cfg(feature = "ssr")]
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] campusconnect::core::config::ConfigError),

    #[error(transparent)]
    Database(#[from] campusconnect::core::db::DbError),

    #[error("Failed to prepare session store: {0}")]
    SessionStore(#[source] sqlx::Error),

    #[error(transparent)]
    Password(#[from] campusconnect::core::auth::PasswordError),

    #[error(transparent)]
    OAuth(#[from] campusconnect::core::auth::OAuthError),

    #[error("Leptos configuration: {0}")]
    Leptos(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "ssr")]
async fn run() -> Result<(), ServerError> {
    use std::sync::Arc;

    use axum::{Extension, Router};
    use campusconnect::app::*;
    use campusconnect::core::auth::{
        AuthApiState, AuthService, JwtService, OAuthProviders, PasswordHasher, SessionLocks,
        auth_api_router, with_sessions,
    };
    use campusconnect::core::config::Config;
    use campusconnect::core::db::{DbConfig, UserRepository, connect};
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use tower_http::compression::{CompressionLayer, CompressionLevel};
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;
    use tower_sessions_sqlx_store::PostgresStore;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load application config from environment variables
    let config = Config::from_env();

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, google={}, github={}",
        config.has_database(),
        config.has_google(),
        config.has_github()
    );

    let session_settings = config.session_settings()?;
    let jwt_config = config.jwt_config()?;

    let pool = connect(&DbConfig::new(config.require_database_url()?)).await?;

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .map_err(ServerError::SessionStore)?;

    let state = Arc::new(AuthApiState {
        auth_service: AuthService::new(
            Arc::new(UserRepository::new(pool)),
            PasswordHasher::new()?,
        ),
        oauth: OAuthProviders::from_credentials(config.google.as_ref(), config.github.as_ref())?,
        jwt_service: JwtService::new(jwt_config),
        session_locks: SessionLocks::new(),
    });

    // Load configuration from Cargo.toml [package.metadata.leptos]
    // Can be overridden via LEPTOS_SITE_ADDR env var for Docker/K8s
    let conf = get_configuration(None).map_err(|e| ServerError::Leptos(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    // Generate the list of routes in your Leptos App
    let routes = generate_route_list(App);

    // Serve pre-compressed static assets from /pkg
    let pkg_service = ServeDir::new(format!("{}/pkg", leptos_options.site_root))
        .precompressed_br()
        .precompressed_gzip();

    let leptos_router = Router::new()
        .nest_service("/pkg", pkg_service)
        .leptos_routes(&leptos_options, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    let app = Router::new()
        .merge(auth_api_router(state.clone()))
        .merge(leptos_router)
        // Server functions read the auth state from request extensions
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CompressionLayer::new()
                .br(true)
                .gzip(true)
                .quality(CompressionLevel::Best),
        );
    let app = with_sessions(app, session_store, &session_settings);

    tracing::info!("listening on http://{}", &addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
