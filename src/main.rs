use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use rapport_algo::auth::JwtAuth;
use rapport_algo::config::{Settings, StorageBackend};
use rapport_algo::core::Matcher;
use rapport_algo::routes::{self, AppState};
use rapport_algo::services::{
    CacheManager, CachedProfileStore, ConnectionService, InMemoryStore, LogNotifier,
    PostgresClient, ProfileStore, RelationshipGraph, TaxonomyCache, TaxonomySource,
};
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}

type Stores = (Arc<dyn ProfileStore>, Arc<dyn RelationshipGraph>, Arc<dyn TaxonomySource>);

async fn build_stores(settings: &Settings) -> std::io::Result<Stores> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            let profiles: Arc<dyn ProfileStore> = store.clone();
            let graph: Arc<dyn RelationshipGraph> = store.clone();
            let taxonomy: Arc<dyn TaxonomySource> = store;
            Ok((profiles, graph, taxonomy))
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let postgres = PostgresClient::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;

            info!("PostgreSQL client initialized (max: {} connections)", db.max_connections.unwrap_or(10));
            let postgres = Arc::new(postgres);
            let profiles: Arc<dyn ProfileStore> = postgres.clone();
            let graph: Arc<dyn RelationshipGraph> = postgres.clone();
            let taxonomy: Arc<dyn TaxonomySource> = postgres;
            Ok((profiles, graph, taxonomy))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    // Initialize logging (LOG_LEVEL / LOG_FORMAT override the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Rapport Algo matching service...");

    let (profiles, graph, taxonomy_source) = build_stores(&settings).await?;

    // Profile cache (Redis tier is optional)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = if settings.cache.redis_url.is_empty() {
        CacheManager::in_memory(l1_cache_size, cache_ttl)
    } else {
        match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to connect to Redis ({}), running with in-process cache only", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        }
    };

    info!("Cache manager initialized (L1: {} entries, TTL: {}s, stats: {:?})", l1_cache_size, cache_ttl, cache.stats());

    let profiles: Arc<dyn ProfileStore> = Arc::new(CachedProfileStore::new(profiles, Arc::new(cache)));

    // Taxonomy labels
    let taxonomy = Arc::new(TaxonomyCache::new());
    match taxonomy.refresh(taxonomy_source.as_ref()).await {
        Ok(count) => info!("Taxonomy cache loaded ({} options)", count),
        Err(e) => warn!("Taxonomy cache not loaded: {}", e),
    }

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights).with_max_results(settings.matching.max_results);

    info!("Matcher initialized with weights: {:?}", weights);

    let connections = ConnectionService::new(profiles, graph, Arc::new(LogNotifier), matcher);

    // Build application state
    let app_state = AppState {
        connections,
        taxonomy,
        taxonomy_source,
    };
    let jwt = JwtAuth::new(&settings.auth.jwt_secret, settings.auth.issuer.clone());

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
