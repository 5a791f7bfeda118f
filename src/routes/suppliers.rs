use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::filter::{SortBy, SortOrder};
use crate::forms::contact::ContactForm;
use crate::forms::filters;
use crate::forms::quote::QuoteRequestForm;
use crate::forms::review::ReviewForm;
use crate::repository::http::HttpRepository;
use crate::routes::{base_context, flash_service_error, redirect, render_template};
use crate::services::ServiceError;
use crate::services::engagement;
use crate::services::feature_flags::FeatureFlagCache;
use crate::services::suppliers as suppliers_service;

const SORT_BY_OPTIONS: [(SortBy, &str); 4] = [
    (SortBy::Rating, "Rating"),
    (SortBy::Popular, "Popularity"),
    (SortBy::Newest, "Newest"),
    (SortBy::Name, "Name"),
];
const SORT_ORDER_OPTIONS: [(SortOrder, &str); 2] =
    [(SortOrder::Desc, "Descending"), (SortOrder::Asc, "Ascending")];

#[get("/")]
pub async fn show_index(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let filter = filters::decode(req.query_string());
    let data = suppliers_service::load_suppliers_page(repo.get_ref(), filter).await;

    let sort_by_options = SORT_BY_OPTIONS
        .iter()
        .map(|(by, label)| (by.as_str(), *label))
        .collect::<Vec<_>>();
    let sort_order_options = SORT_ORDER_OPTIONS
        .iter()
        .map(|(order, label)| (order.as_str(), *label))
        .collect::<Vec<_>>();

    let mut context = base_context(&flash_messages, &session, "index");
    context.insert("data", &data);
    context.insert("sort_by_options", &sort_by_options);
    context.insert("sort_order_options", &sort_order_options);

    render_template(&tera, "suppliers/index.html", &context)
}

#[get("/suppliers/{slug}")]
pub async fn show_supplier(
    slug: web::Path<String>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flags: web::Data<FeatureFlagCache>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let slug = slug.into_inner();

    let data = match suppliers_service::load_supplier_page(repo.get_ref(), &flags, &slug).await {
        Ok(data) => data,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Supplier not found.").send();
            return redirect("/");
        }
        Err(err) => {
            log::error!("Failed to load supplier {slug}: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(&flash_messages, &session, "supplier");
    context.insert("data", &data);

    render_template(&tera, "suppliers/show.html", &context)
}

#[post("/suppliers/{slug}/reviews")]
pub async fn add_review(
    slug: web::Path<String>,
    repo: web::Data<HttpRepository>,
    flags: web::Data<FeatureFlagCache>,
    web::Form(form): web::Form<ReviewForm>,
) -> impl Responder {
    let slug = slug.into_inner();

    match engagement::leave_review(repo.get_ref(), &flags, &slug, form).await {
        Ok(_) => FlashMessage::success("Thanks! Your review has been submitted.").send(),
        Err(err) => flash_service_error(&err),
    }

    redirect(&format!("/suppliers/{slug}"))
}

#[post("/suppliers/{slug}/quote")]
pub async fn add_quote_request(
    slug: web::Path<String>,
    repo: web::Data<HttpRepository>,
    flags: web::Data<FeatureFlagCache>,
    web::Form(form): web::Form<QuoteRequestForm>,
) -> impl Responder {
    let slug = slug.into_inner();

    match engagement::request_quote(repo.get_ref(), &flags, &slug, form).await {
        Ok(supplier) => FlashMessage::success(format!(
            "Your quote request has been sent to {}.",
            supplier.name
        ))
        .send(),
        Err(err) => flash_service_error(&err),
    }

    redirect(&format!("/suppliers/{slug}"))
}

#[post("/suppliers/{slug}/contact")]
pub async fn contact_supplier(
    slug: web::Path<String>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    let slug = slug.into_inner();

    match engagement::contact_supplier(repo.get_ref(), Some(&slug), form).await {
        Ok(()) => FlashMessage::success("Your message has been sent.").send(),
        Err(err) => flash_service_error(&err),
    }

    redirect(&format!("/suppliers/{slug}"))
}

#[get("/contact")]
pub async fn show_contact(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &session, "contact");
    render_template(&tera, "main/contact.html", &context)
}

#[post("/contact")]
pub async fn send_contact(
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<ContactForm>,
) -> impl Responder {
    match engagement::contact_supplier(repo.get_ref(), None, form).await {
        Ok(()) => {
            FlashMessage::success("Thanks for getting in touch. We'll reply shortly.").send();
            redirect("/")
        }
        Err(err) => {
            flash_service_error(&err);
            redirect("/contact")
        }
    }
}
