use actix_session::Session;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::forms::FormError;
use crate::selection::SelectionStorage;
use crate::services::ServiceError;

pub mod api;
pub mod selection;
pub mod submit;
pub mod suppliers;

const VISITOR_KEY: &str = "visitor_id";

/// Maps a flash message level to the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Only same-site absolute paths are followed after a form post.
pub fn safe_next(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: pending alerts, the active navigation
/// entry and the visitor's selection counts.
pub fn base_context<S>(
    flash_messages: &IncomingFlashMessages,
    storage: &S,
    current_page: &str,
) -> Context
where
    S: SelectionStorage + ?Sized,
{
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let (favorites, compare) = crate::services::selection::selected_ids(storage);

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("favorites", &favorites);
    context.insert("compare", &compare);
    context
}

/// Flashes one alert per invalid field.
pub fn flash_form_errors(err: &FormError) {
    for (field, message) in err.field_errors() {
        FlashMessage::error(format!("{field}: {message}")).send();
    }
}

/// Flashes a user-facing message for a failed service call.
pub fn flash_service_error(err: &ServiceError) {
    match err {
        ServiceError::Form(form_error) => flash_form_errors(form_error),
        ServiceError::NotFound => FlashMessage::error("Supplier not found.").send(),
        ServiceError::FeatureDisabled(_) => {
            FlashMessage::warning("This feature is currently unavailable.").send()
        }
        ServiceError::Conflict(message) => FlashMessage::warning(message.clone()).send(),
        ServiceError::TypeConstraint(_) | ServiceError::Internal(_) => {
            FlashMessage::error("Something went wrong. Please try again.").send()
        }
    }
}

/// Stable per-session identifier, created on first use.
pub fn visitor_id(session: &Session) -> String {
    if let Ok(Some(id)) = session.get::<String>(VISITOR_KEY) {
        return id;
    }
    let id = uuid::Uuid::new_v4().to_string();
    if let Err(e) = session.insert(VISITOR_KEY, &id) {
        log::warn!("Failed to store visitor id: {e}");
    }
    id
}
