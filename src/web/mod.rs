pub mod html;
pub mod session;

use std::sync::{Mutex, MutexGuard};

use actix_files::Files;
use actix_session::Session;
use actix_web::cookie::Key;
use actix_web::http::header;
use actix_web::{error, middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use serde::Deserialize;

use crate::booking::{BookingApp, PageState};
use crate::config::selectable_years;
use crate::store::KeyValueStore;
use crate::view::render_calendar;
use html::{render_page, PageContext};
use session::{load_page, save_page, session_middleware, set_notice, take_notice};

pub type SharedApp = BookingApp<Box<dyn KeyValueStore + Send>>;

/// Server state: the one availability store every request works against.
pub struct AppState {
    pub app: Mutex<SharedApp>,
    pub clock: fn() -> NaiveDateTime,
}

impl AppState {
    pub fn new(app: SharedApp) -> Self {
        AppState {
            app: Mutex::new(app),
            clock: local_now,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SharedApp>> {
        self.app
            .lock()
            .map_err(|_| error::ErrorInternalServerError("booking state is unavailable"))
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Deserialize)]
pub struct MonthForm {
    year: i32,
    month: i32,
}

#[derive(Deserialize)]
pub struct SlotForm {
    time: String,
}

#[derive(Deserialize)]
pub struct BookForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    time_slot: String,
}

#[derive(Deserialize)]
pub struct CancelForm {
    day: u32,
    time: String,
}

#[derive(Deserialize)]
pub struct ConfirmForm {
    day: u32,
    time: String,
    confirmed: bool,
}

#[derive(Deserialize)]
pub struct MonthQuery {
    year: i32,
    month: i32,
}

fn day_action(day: u32) -> String {
    format!("/day/{}", day)
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

fn back_to_page() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

// Full page render
async fn index(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let now = (state.clock)();
    let page = load_page(&session, now.date());
    let notice = take_notice(&session);

    let mut app = state.lock()?;
    let calendar = app.calendar(&page, day_action);
    let schedule = app.current_schedule(&page, now);
    drop(app);

    let years = selectable_years(now.date().year());
    let html = render_page(&PageContext {
        page: &page,
        years: &years,
        calendar: calendar.as_ref(),
        schedule: schedule.as_ref(),
        notice: notice.as_ref(),
    });

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

// Year/month selector change
async fn change_month(
    form: web::Form<MonthForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = load_page(&session, now.date());
    let result = state.lock()?.change_month(&mut page, form.year, form.month);
    if let Err(e) = result {
        set_notice(&session, &e.into())?;
    }
    save_page(&session, &page)?;
    Ok(back_to_page())
}

// Day cell click
async fn select_day(
    day: web::Path<u32>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = load_page(&session, now.date());
    let result = state.lock()?.show_schedule(&mut page, day.into_inner(), now);
    if let Err(e) = result {
        set_notice(&session, &e.into())?;
    }
    save_page(&session, &page)?;
    Ok(back_to_page())
}

// Open slot click
async fn select_slot(
    form: web::Form<SlotForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = load_page(&session, now.date());
    state.lock()?.select_time_slot(&mut page, &form.time);
    save_page(&session, &page)?;
    Ok(back_to_page())
}

// Booking form submit
async fn submit_booking(
    form: web::Form<BookForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = load_page(&session, now.date());
    let form = form.into_inner();
    page.form.name = form.name;
    page.form.time_slot = form.time_slot;

    let notice = state.lock()?.submit_booking(&mut page);
    set_notice(&session, &notice)?;
    save_page(&session, &page)?;
    Ok(back_to_page())
}

// Cancel control click, answered by the confirmation dialog
async fn request_cancel(
    form: web::Form<CancelForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let page = load_page(&session, now.date());
    let notice = match state.lock()?.request_cancellation(&page, form.day, &form.time, now) {
        Ok(prompt) => prompt,
        Err(e) => e.into(),
    };
    set_notice(&session, &notice)?;
    Ok(back_to_page())
}

async fn confirm_cancel(
    form: web::Form<ConfirmForm>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = load_page(&session, now.date());
    let result = state
        .lock()?
        .cancel_booking(&mut page, form.day, &form.time, form.confirmed, now);
    if let Err(e) = result {
        set_notice(&session, &e.into())?;
    }
    save_page(&session, &page)?;
    Ok(back_to_page())
}

// JSON mirrors
async fn get_calendar(query: web::Query<MonthQuery>) -> Result<HttpResponse> {
    match render_calendar(query.year, query.month, None, day_action) {
        Some(calendar) => Ok(HttpResponse::Ok().json(calendar)),
        None => Ok(bad_request("Invalid year or month")),
    }
}

async fn get_schedule(
    day: web::Path<u32>,
    query: web::Query<MonthQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let now = (state.clock)();
    let mut page = PageState::starting_on(now.date());
    let mut app = state.lock()?;
    let result = app
        .change_month(&mut page, query.year, query.month)
        .and_then(|()| app.show_schedule(&mut page, day.into_inner(), now));
    drop(app);

    match result {
        Ok(schedule) => Ok(HttpResponse::Ok().json(schedule)),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn get_availability(state: web::Data<AppState>) -> Result<HttpResponse> {
    let app = state.lock()?;
    Ok(HttpResponse::Ok().json(app.store().availability()))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/month", web::post().to(change_month))
        .route("/day/{day}", web::post().to(select_day))
        .route("/slot", web::post().to(select_slot))
        .route("/book", web::post().to(submit_booking))
        .route("/cancel", web::post().to(request_cancel))
        .route("/cancel/confirm", web::post().to(confirm_cancel))
        .route("/api/calendar", web::get().to(get_calendar))
        .route("/api/availability", web::get().to(get_availability))
        .service(web::resource("/api/schedule/{day}").route(web::get().to(get_schedule)));
}

pub async fn start_server(port: u16, app: SharedApp, session_key: Key) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(app));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(session_key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
