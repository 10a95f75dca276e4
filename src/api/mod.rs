use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::{AdminService, AuthService, CatalogService, ImageService, LibraryService};
use crate::state::SharedState;

mod admin;
pub mod auth;
mod catalog;
mod error;
mod library;
mod observability;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn image_service(&self) -> &Arc<ImageService> {
        &self.shared.image_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn library_service(&self) -> &Arc<dyn LibraryService> {
        &self.shared.library_service
    }

    #[must_use]
    pub fn admin_service(&self) -> &Arc<dyn AdminService> {
        &self.shared.admin_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_timeout_minutes,
        )));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = Router::new()
        .merge(create_public_router())
        .merge(create_user_router(state.clone()))
        .nest("/admin", create_admin_router(state.clone()))
        .layer(session_layer)
        .with_state(state);

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/banner", get(catalog::banners))
        .route("/listCardsTending", get(catalog::trending))
        .route("/listCardsTrending", get(catalog::trending))
        .route("/dramaListCard", get(catalog::drama))
        .route("/moviesCards", get(catalog::movie_cards))
        .route("/seriesCards", get(catalog::series_cards))
        .route("/moviesGenre", get(catalog::genres))
        .route("/seriesGenre", get(catalog::genres))
        .route("/searchAll", get(catalog::search_all))
        .route("/searchMovies", get(catalog::search_movies))
        .route("/searchSeries", get(catalog::search_series))
        .route("/view", post(catalog::increment_view))
        .route(
            "/moviesDetail",
            get(catalog::movie_detail).post(catalog::movie_detail),
        )
        .route(
            "/moviesSuggest",
            get(catalog::movie_suggestions).post(catalog::movie_suggestions),
        )
        .route(
            "/seriesDetail",
            get(catalog::series_detail).post(catalog::series_detail),
        )
        .route(
            "/seriesSuggest",
            get(catalog::series_suggestions).post(catalog::series_suggestions),
        )
        .route("/admin/login", post(auth::admin_login))
        .route("/admin/logout", post(auth::admin_logout))
}

fn create_user_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(auth::profile))
        .route("/updateProfile", post(auth::update_profile))
        .route("/userPassword", post(auth::update_password))
        .route("/logout", post(auth::logout))
        .route("/myListCards", get(library::my_list))
        .route("/mayLike", get(library::may_like))
        .route("/addMovieList", post(library::add_to_list))
        .route("/removeMovieList", post(library::remove_from_list))
        .route("/addMovieFav", post(library::add_favorite))
        .route("/removeMovieFav", post(library::remove_favorite))
        .route(
            "/checkList",
            get(library::check_list).post(library::check_list),
        )
        .route(
            "/checkFav",
            get(library::check_favorite).post(library::check_favorite),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

fn create_admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/genres",
            get(admin::list_genres).post(admin::create_genre),
        )
        .route(
            "/genres/{id}",
            put(admin::update_genre).delete(admin::delete_genre),
        )
        .route(
            "/movies",
            get(admin::list_movies).post(admin::create_movie),
        )
        .route(
            "/movies/{id}",
            get(admin::get_movie)
                .put(admin::update_movie)
                .delete(admin::delete_movie),
        )
        .route("/movies/{id}/seasons", get(admin::list_seasons))
        .route("/seasons", post(admin::create_season))
        .route(
            "/seasons/{id}",
            put(admin::update_season).delete(admin::delete_season),
        )
        .route("/seasons/{id}/episodes", get(admin::list_episodes))
        .route("/episodes", post(admin::create_episode))
        .route(
            "/episodes/{id}",
            put(admin::update_episode).delete(admin::delete_episode),
        )
        .route(
            "/banners",
            get(admin::list_banners).post(admin::create_banner),
        )
        .route(
            "/banners/{id}",
            put(admin::update_banner).delete(admin::delete_banner),
        )
        .route("/attachments", post(admin::create_attachment))
        .route(
            "/attachments/{id}",
            get(admin::get_attachment).delete(admin::delete_attachment),
        )
        .route("/users", get(admin::list_users))
        .route("/users/{id}", axum::routing::delete(admin::delete_user))
        .route("/users/{id}/flags", put(admin::set_user_flags))
        .route("/series/search", get(admin::search_series))
        .route("/series/{id}/seasons", get(admin::series_seasons))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::admin_middleware,
        ))
}
