use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::types::SupplierId;
use crate::repository::http::HttpRepository;
use crate::routes::{base_context, redirect, render_template, safe_next};
use crate::services::selection::{self as selection_service, SelectionOutcome};

#[derive(Deserialize)]
pub struct SelectionForm {
    /// Page to return to after the toggle.
    next: Option<String>,
}

fn parse_id(raw: String) -> Option<SupplierId> {
    SupplierId::new(raw)
        .map_err(|e| log::warn!("Ignoring selection toggle with bad id: {e}"))
        .ok()
}

#[post("/favorites/{supplier_id}")]
pub async fn toggle_favorite(
    supplier_id: web::Path<String>,
    session: Session,
    web::Form(form): web::Form<SelectionForm>,
) -> impl Responder {
    let next = safe_next(form.next.as_deref(), "/favorites");
    let Some(id) = parse_id(supplier_id.into_inner()) else {
        return redirect(&next);
    };

    match selection_service::toggle_favorite(&session, &id) {
        SelectionOutcome::Added => FlashMessage::success("Added to favourites.").send(),
        SelectionOutcome::Removed => FlashMessage::info("Removed from favourites.").send(),
        SelectionOutcome::CapacityExceeded { capacity } => {
            FlashMessage::warning(format!("You can only keep {capacity} favourites.")).send()
        }
    }

    redirect(&next)
}

#[post("/compare/{supplier_id}")]
pub async fn toggle_compare(
    supplier_id: web::Path<String>,
    session: Session,
    web::Form(form): web::Form<SelectionForm>,
) -> impl Responder {
    let next = safe_next(form.next.as_deref(), "/compare");
    let Some(id) = parse_id(supplier_id.into_inner()) else {
        return redirect(&next);
    };

    match selection_service::toggle_compare(&session, &id) {
        SelectionOutcome::Added => FlashMessage::success("Added to comparison.").send(),
        SelectionOutcome::Removed => FlashMessage::info("Removed from comparison.").send(),
        SelectionOutcome::CapacityExceeded { capacity } => FlashMessage::warning(format!(
            "You can only compare up to {capacity} suppliers."
        ))
        .send(),
    }

    redirect(&next)
}

#[post("/compare/clear")]
pub async fn clear_compare(session: Session) -> impl Responder {
    selection_service::clear_compare(&session);
    redirect("/compare")
}

#[get("/favorites")]
pub async fn show_favorites(
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match selection_service::load_favorites(repo.get_ref(), &session).await {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to load favourites: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &session, "favorites");
    context.insert("data", &data);

    render_template(&tera, "selection/favorites.html", &context)
}

#[get("/compare")]
pub async fn show_compare(
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match selection_service::load_compare(repo.get_ref(), &session).await {
        Ok(data) => data,
        Err(err) => {
            log::error!("Failed to load comparison: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &session, "compare");
    context.insert("data", &data);

    render_template(&tera, "selection/compare.html", &context)
}
