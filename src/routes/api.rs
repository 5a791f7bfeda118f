use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::domain::feature_flag::FeatureFlag;
use crate::forms::filters;
use crate::repository::http::HttpRepository;
use crate::routes::visitor_id;
use crate::services::feature_flags::FeatureFlagCache;
use crate::services::suppliers::{self as suppliers_service, ListingSequencers};

/// JSON listing for in-page filtering. A request overtaken by a newer one
/// from the same visitor answers `204 No Content`.
#[get("/suppliers")]
pub async fn api_suppliers(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    sequencers: web::Data<ListingSequencers>,
) -> impl Responder {
    let filter = filters::decode(req.query_string());
    let sequencer = sequencers.for_visitor(&visitor_id(&session));

    match suppliers_service::load_suppliers_api(repo.get_ref(), &sequencer, filter).await {
        Some(response) if response.success => HttpResponse::Ok().json(response),
        Some(response) => HttpResponse::BadGateway().json(response),
        None => HttpResponse::NoContent().finish(),
    }
}

#[derive(Debug, Deserialize)]
pub struct InvalidateFlagsQuery {
    flag: Option<FeatureFlag>,
}

/// Drops cached flag values so the next lookup reads the backend again.
/// Without `?flag=` every flag is dropped.
#[post("/feature-flags/invalidate")]
pub async fn invalidate_feature_flags(
    flags: web::Data<FeatureFlagCache>,
    query: web::Query<InvalidateFlagsQuery>,
) -> impl Responder {
    match query.flag {
        Some(flag) => {
            flags.invalidate_flag(flag);
            log::info!("Feature flag {flag} invalidated");
        }
        None => {
            flags.invalidate();
            log::info!("All feature flags invalidated");
        }
    }
    HttpResponse::NoContent().finish()
}
