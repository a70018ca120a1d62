use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod credentials;
pub mod generators;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::credentials::handlers::validate_credentials,
        crate::credentials::handlers::generate_document
    ),
    components(
        schemas(
            credentials::model::CredentialRecord,
            credentials::model::ValidationReport,
            credentials::model::ValidationErrorResponse,
            credentials::model::DeliveryFormat,
            credentials::delivery::FileContent,
            credentials::delivery::FileMetadata,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Credentials", description = "I-Tax credentials validation and document endpoints.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

/// Answer JSON body errors with the same envelope as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            let message = err.to_string();
            log::debug!("Rejected request body: {}", message);
            actix_web::error::InternalError::from_response(
                err,
                actix_web::HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
            )
            .into()
        })
}

/// Same envelope for unparseable query strings, e.g. an unknown `format`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::debug!("Rejected query string: {}", message);
        actix_web::error::InternalError::from_response(
            err,
            actix_web::HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    })
}

fn cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

    for origin in &config.allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

pub async fn run(config: AppConfig) -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .try_init()
        .ok();

    let app_state = web::Data::new(AppState::from_config(&config));

    let prometheus = PrometheusMetricsBuilder::new("itax_credentials_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Starting server at http://{}:{} ({} render backend, static files from {})",
        config.host,
        config.port,
        app_state.generator.engine_name(),
        config.static_dir.display()
    );

    let bind = (config.host.clone(), config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&config))
            .wrap(Logger::new("%a \"%r\" %s %b %T"))
            .app_data(app_state.clone())
            .app_data(json_config())
            .app_data(query_config())
            .service(web::scope("/api").configure(credentials::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(actix_files::Files::new("/", &config.static_dir).index_file("index.html"))
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind(bind)?
    .run()
    .await
}
