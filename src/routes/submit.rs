use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::supplier::SubmitSupplierForm;
use crate::repository::http::HttpRepository;
use crate::routes::{base_context, flash_service_error, redirect, render_template};
use crate::services::submit as submit_service;

#[get("/submit")]
pub async fn show_submit(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &session, "submit");
    render_template(&tera, "submit/index.html", &context)
}

#[post("/submit")]
pub async fn submit_supplier(repo: web::Data<HttpRepository>, body: web::Bytes) -> impl Responder {
    // Tags and service areas arrive as repeated keys.
    let form: SubmitSupplierForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            log::warn!("Failed to parse supplier submission: {e}");
            FlashMessage::error("Please check the form and try again.").send();
            return redirect("/submit");
        }
    };

    match submit_service::submit_supplier(repo.get_ref(), form).await {
        Ok(created) => {
            FlashMessage::success(format!(
                "Thanks! {} has been submitted and will appear once approved.",
                created.name
            ))
            .send();
            redirect("/")
        }
        Err(err) => {
            flash_service_error(&err);
            redirect("/submit")
        }
    }
}
