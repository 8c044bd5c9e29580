//! HTTP routes over [`RateStore`].
//!
//! | Method | Path                    | Operation    |
//! |--------|-------------------------|--------------|
//! | GET    | `/rates`                | list all     |
//! | GET    | `/rate/{currency_pair}` | latest rate  |
//! | POST   | `/rate`                 | create       |
//! | PUT    | `/rate/{rate_id}`       | update       |
//! | DELETE | `/rate/{rate_id}`       | delete       |

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, delete, get, post, put, web};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::{error::StoreError, exchange_rate::NewRate, rate_store::RateStore};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct Detail {
    detail: String,
}

#[derive(Serialize)]
struct Message {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
}

impl Message {
    fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::StorageUnavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Store(StoreError::StorageUnavailable(e)) = self {
            error!("Storage failure: {}", e);
        }

        HttpResponse::build(self.status_code()).json(Detail {
            detail: self.to_string(),
        })
    }
}

/// Registers the rate routes and maps malformed bodies or ids to [`ApiError::InvalidInput`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(get_rates)
        .service(get_latest_rate)
        .service(add_rate)
        .service(update_rate)
        .service(delete_rate);
}

// Only a body that fails to deserialize is bad input; size and content-type
// errors keep actix's own status.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::Deserialize(e) => ApiError::InvalidInput(e.to_string()).into(),
        other => other.into(),
    }
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::InvalidInput(err.to_string()).into()
}

fn validated(rate: NewRate) -> Result<NewRate, ApiError> {
    if !rate.rate.is_finite() {
        return Err(ApiError::InvalidInput(format!(
            "Rate must be a finite number, got {}",
            rate.rate
        )));
    }
    Ok(rate)
}

#[get("/rates")]
async fn get_rates(store: web::Data<RateStore>) -> Result<HttpResponse, ApiError> {
    let records = store.list_all().await?;
    Ok(HttpResponse::Ok().json(records))
}

// The pair may itself contain '/', e.g. EUR/USD.
#[get("/rate/{currency_pair:.+}")]
async fn get_latest_rate(
    store: web::Data<RateStore>,
    currency_pair: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let record = store.get_latest(&currency_pair).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[post("/rate")]
async fn add_rate(
    store: web::Data<RateStore>,
    rate: web::Json<NewRate>,
) -> Result<HttpResponse, ApiError> {
    let rate = validated(rate.into_inner())?;
    let id = store.create(&rate).await?;
    Ok(HttpResponse::Created().json(Message {
        message: "Rate added",
        id: Some(id),
    }))
}

#[put("/rate/{rate_id}")]
async fn update_rate(
    store: web::Data<RateStore>,
    rate_id: web::Path<i64>,
    rate: web::Json<NewRate>,
) -> Result<HttpResponse, ApiError> {
    let rate = validated(rate.into_inner())?;
    store.update(rate_id.into_inner(), &rate).await?;
    Ok(HttpResponse::Ok().json(Message::new("Rate updated")))
}

#[delete("/rate/{rate_id}")]
async fn delete_rate(
    store: web::Data<RateStore>,
    rate_id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    store.delete(rate_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Message::new("Rate deleted")))
}
