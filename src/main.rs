mod booking;
mod calendar;
mod config;
mod display;
mod error;
mod export;
mod schedule;
mod store;
mod view;
mod web;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDateTime};
use clap::Parser;
use dialoguer::Confirm;

use booking::{BookingApp, Notification, PageState};
use config::{Cli, Command, MonthArgs};
use display::{print_calendar, print_schedule};
use export::export_bookings_to_csv;
use store::{FileStore, KeyValueStore, MemoryStore};

fn init_logging(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Page state for the month picked on the command line, defaulting to today.
fn page_for(month: MonthArgs, now: NaiveDateTime) -> PageState {
    let year = month.year.unwrap_or_else(|| now.year());
    let month0 = month.month.map(|m| m as i32 - 1).unwrap_or(now.month0() as i32);
    PageState::new(year, month0)
}

fn print_notice(notice: &Notification) {
    if notice.is_success() {
        println!("{}", notice.message());
    } else {
        eprintln!("{}", notice.message());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let features = cli.features();
    let backend: Box<dyn KeyValueStore + Send> = if features.persists {
        Box::new(
            FileStore::open(&cli.storage)
                .with_context(|| format!("failed to open storage {}", cli.storage.display()))?,
        )
    } else {
        Box::new(MemoryStore::new())
    };
    let mut app = BookingApp::new(backend, features);
    let now = Local::now().naive_local();

    match cli.command {
        Command::Serve { port, session_key } => {
            let key = web::session::session_key(session_key.as_deref())?;
            tracing::info!(
                port,
                persists = features.persists,
                cancellation = features.supports_cancellation,
                "starting booking server"
            );
            println!("Access the booking page at http://localhost:{}", port);
            web::start_server(port, app, key).await?;
        }
        Command::Calendar(month) => {
            let page = page_for(month, now);
            let calendar = app
                .calendar(&page, |_| ())
                .context("year out of range")?;
            print_calendar(&calendar);
        }
        Command::Schedule { month, day } => {
            let mut page = page_for(month, now);
            let schedule = app.show_schedule(&mut page, day, now)?;
            print_schedule(&schedule);
        }
        Command::Book { month, day, time, name } => {
            let mut page = page_for(month, now);
            app.show_schedule(&mut page, day, now)?;
            app.select_time_slot(&mut page, &time);
            page.form.name = name;

            let notice = app.submit_booking(&mut page);
            print_notice(&notice);
            if let Some(schedule) = app.current_schedule(&page, now) {
                print_schedule(&schedule);
            }
        }
        Command::Cancel { month, day, time, yes } => {
            let mut page = page_for(month, now);
            app.show_schedule(&mut page, day, now)?;

            let prompt = match app.request_cancellation(&page, day, &time, now) {
                Ok(prompt) => prompt,
                Err(e) => {
                    print_notice(&e.into());
                    return Ok(());
                }
            };
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(prompt.message())
                    .default(false)
                    .interact()?;

            match app.cancel_booking(&mut page, day, &time, confirmed, now) {
                Ok(true) => {
                    if let Some(schedule) = app.current_schedule(&page, now) {
                        print_schedule(&schedule);
                    }
                }
                Ok(false) => println!("Booking kept"),
                Err(e) => print_notice(&e.into()),
            }
        }
        Command::Export { output } => {
            let written = export_bookings_to_csv(app.store().availability(), &output)?;
            println!("Exported {} bookings to {}", written, output.display());
        }
    }

    Ok(())
}
