//! Last-resort error page for unexpected failures.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result};

/// Static so it renders even when templates are what failed.
pub const INTERNAL_ERROR_PAGE: &str = include_str!("../templates/errors/500.html");

/// Replaces every `500` response with [`INTERNAL_ERROR_PAGE`].
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, render_internal_error)
}

fn render_internal_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    log::error!("Serving error page for {} {}", req.method(), req.path());

    let response = HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(INTERNAL_ERROR_PAGE);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
