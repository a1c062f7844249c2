use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::error::ErrorInternalServerError;
use chrono::NaiveDate;
use rand::Rng;

use crate::booking::{Notification, PageState};

const PAGE_KEY: &str = "page";
const NOTICE_KEY: &str = "notice";
const COOKIE_NAME: &str = "booking-page";

/// Cookie session holding one browser's page state.
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(COOKIE_NAME.to_string())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_secure(false)
        .build()
}

/// Session signing key: the configured one, or a random key for this process.
pub fn session_key(configured: Option<&str>) -> anyhow::Result<Key> {
    match configured {
        Some(raw) => Key::try_from(raw.as_bytes())
            .map_err(|_| anyhow::anyhow!("session key must be at least 64 bytes")),
        None => {
            let mut bytes = [0u8; 64];
            rand::thread_rng().fill(&mut bytes[..]);
            Ok(Key::from(&bytes))
        }
    }
}

/// Page state stored in the session, or a fresh page on `today`'s month.
pub fn load_page(session: &Session, today: NaiveDate) -> PageState {
    match session.get::<PageState>(PAGE_KEY) {
        Ok(Some(page)) => page,
        Ok(None) => PageState::starting_on(today),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable page state");
            PageState::starting_on(today)
        }
    }
}

pub fn save_page(session: &Session, page: &PageState) -> actix_web::Result<()> {
    session
        .insert(PAGE_KEY, page)
        .map_err(ErrorInternalServerError)
}

/// Queues a notification for the next page render.
pub fn set_notice(session: &Session, notice: &Notification) -> actix_web::Result<()> {
    session
        .insert(NOTICE_KEY, notice)
        .map_err(ErrorInternalServerError)
}

/// Removes and returns the pending notification; it is shown exactly once.
pub fn take_notice(session: &Session) -> Option<Notification> {
    session.remove_as::<Notification>(NOTICE_KEY)?.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_session_keys_are_rejected() {
        assert!(session_key(Some("too short")).is_err());
        assert!(session_key(Some(&"k".repeat(64))).is_ok());
    }

    #[test]
    fn random_keys_differ() {
        let a = session_key(None).unwrap();
        let b = session_key(None).unwrap();
        assert_ne!(a.master(), b.master());
    }
}
