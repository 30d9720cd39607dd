use actix_web::{web, HttpResponse};

use crate::errors::EngineError;

#[cfg(test)]
macro_rules! test_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool))
                .configure(crate::handlers::configure)
                .default_service(actix_web::web::to(crate::handlers::not_found)),
        )
        .await
    };
}

pub mod users;
pub mod items;
pub mod stocks;

/// Mounts every route and the extractor configs that turn bad input into 422.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| {
        EngineError::UnprocessableEntity(format!("Failed to parse JSON body: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _| {
        EngineError::UnprocessableEntity(format!("Failed to parse path parameter: {}", err)).into()
    }));

    users::configure(cfg);
    items::configure(cfg);
    stocks::configure(cfg);
}

pub async fn not_found() -> Result<HttpResponse, EngineError> {
    Err(EngineError::NotFound("Resource not found.".to_owned()))
}

pub async fn method_not_allowed() -> Result<HttpResponse, EngineError> {
    Err(EngineError::MethodNotAllowed("HTTP method not allowed on this resource.".to_owned()))
}
