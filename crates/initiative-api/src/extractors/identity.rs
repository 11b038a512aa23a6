//! `Identity` extractor: the caller's stable subscriber id, from the
//! identity cookie or freshly issued.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;
use tracing::debug;

use initiative_core::config::SessionConfig;
use initiative_core::types::SubscriberId;

use crate::state::AppState;

/// Resolved caller identity.
///
/// Handlers return `jar` with their response so a newly issued cookie
/// reaches the browser.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable subscriber id.
    pub uid: SubscriberId,
    /// Cookie jar, carrying the new cookie when one was issued.
    pub jar: CookieJar,
    /// Whether `uid` was issued by this request.
    pub issued: bool,
}

impl Identity {
    /// Reads the identity cookie from `jar`, issuing a new id when absent.
    pub fn resolve(jar: CookieJar, config: &SessionConfig) -> Self {
        let existing = jar
            .get(&config.identity_cookie)
            .map(|cookie| cookie.value().trim().to_string())
            .filter(|value| !value.is_empty());

        match existing {
            Some(value) => Self {
                uid: SubscriberId::new(value),
                jar,
                issued: false,
            },
            None => {
                let uid = SubscriberId::generate();
                debug!(uid = %uid, "Issued new identity");
                let jar = jar.add(identity_cookie(config, &uid));
                Self {
                    uid,
                    jar,
                    issued: true,
                }
            }
        }
    }
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self::resolve(jar, &state.config.session))
    }
}

/// HttpOnly, site-wide identity cookie.
fn identity_cookie(config: &SessionConfig, uid: &SubscriberId) -> Cookie<'static> {
    Cookie::build((config.identity_cookie.clone(), uid.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(config.identity_cookie_max_age_days.max(0)))
        .build()
}
