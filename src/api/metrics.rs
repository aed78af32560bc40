use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static GUIDE_REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static GUIDE_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static LOOKUP_FAILURE_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_guide_request_count() {
    GUIDE_REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_guide_error_count() {
    GUIDE_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_lookup_failure_count() {
    LOOKUP_FAILURE_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub guide_requests_total: u64,
    pub guide_errors_total: u64,
    pub lookup_failures_total: u64,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "System metrics", body = MetricsResponse)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let requests = GUIDE_REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = GUIDE_ERROR_COUNT.load(Ordering::Relaxed);
    let lookup_failures = LOOKUP_FAILURE_COUNT.load(Ordering::Relaxed);

    let metrics = format!(
        "# HELP guide_requests_total Total number of guide generation requests\n\
         # TYPE guide_requests_total counter\n\
         guide_requests_total {}\n\
         \n\
         # HELP guide_errors_total Total number of failed guide generations\n\
         # TYPE guide_errors_total counter\n\
         guide_errors_total {}\n\
         \n\
         # HELP lookup_failures_total Total number of failed lookup calls\n\
         # TYPE lookup_failures_total counter\n\
         lookup_failures_total {}\n",
        requests, errors, lookup_failures
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
