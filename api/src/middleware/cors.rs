//! CORS middleware configuration for cross-origin requests.

use actix_cors::Cors;
use actix_web::http::header;
use std::env;

use ag_shared::config::Environment;

/// Creates a CORS middleware instance configured for the environment
///
/// Development allows any origin for easy local testing; production
/// restricts origins to the comma-separated `ALLOWED_ORIGINS` variable.
pub fn create_cors(environment: Environment) -> Cors {
    if environment.is_production() {
        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();

        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        for origin in allowed_origins.split(',').map(str::trim) {
            if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }

        cors
    } else {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600)
    }
}
