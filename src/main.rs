use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use http::{Method, header};
use std::net::SocketAddr;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::config::Config;
use folio::state::AppState;
use folio::{handlers, middleware_layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = AppState::new(&config)?;
    tracing::info!("AppState initialized");

    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    // Public surface: published content, settings read (the theme color
    // is needed before login), and contact submission.
    let public_routes = Router::new()
        .route("/api/posts", get(handlers::posts::list_posts))
        .route("/api/posts/{id}", get(handlers::posts::get_post))
        .route("/api/projects", get(handlers::projects::list_projects))
        .route(
            "/api/testimonials",
            get(handlers::testimonials::list_testimonials),
        )
        .route(
            "/api/statistics",
            get(handlers::statistics::list_statistics),
        )
        .route("/api/profile", get(handlers::profile::get_profile))
        .route("/api/settings", get(handlers::settings::get_settings))
        .route("/api/contact", post(handlers::contact::submit_message))
        .with_state(state.clone());

    let login_routes = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::rate_limit::rate_limit_login,
        ))
        .with_state(state.clone());

    // Any valid session: logout and the session read the expiry monitor
    // polls.
    let session_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::current_session))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    // Admin only: all content mutation plus the message inbox, dashboard
    // counters, and the settings write path.
    let admin_routes = Router::new()
        .route("/api/posts", post(handlers::posts::create_post))
        .route("/api/posts/{id}", put(handlers::posts::update_post))
        .route("/api/posts/{id}", delete(handlers::posts::delete_post))
        .route("/api/projects", post(handlers::projects::create_project))
        .route("/api/projects/{id}", put(handlers::projects::update_project))
        .route(
            "/api/projects/{id}",
            delete(handlers::projects::delete_project),
        )
        .route(
            "/api/testimonials",
            post(handlers::testimonials::create_testimonial),
        )
        .route(
            "/api/testimonials/{id}",
            put(handlers::testimonials::update_testimonial),
        )
        .route(
            "/api/testimonials/{id}",
            delete(handlers::testimonials::delete_testimonial),
        )
        .route(
            "/api/statistics",
            post(handlers::statistics::create_statistic),
        )
        .route(
            "/api/statistics/{id}",
            put(handlers::statistics::update_statistic),
        )
        .route(
            "/api/statistics/{id}",
            delete(handlers::statistics::delete_statistic),
        )
        .route("/api/contact", get(handlers::contact::list_messages))
        .route("/api/contact/{id}", put(handlers::contact::update_message))
        .route("/api/contact/{id}", delete(handlers::contact::delete_message))
        .route(
            "/api/admin/stats",
            get(handlers::dashboard::get_dashboard_stats),
        )
        .route("/api/profile", put(handlers::profile::update_profile))
        .route("/api/settings", put(handlers::settings::update_settings))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_admin,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
