//! One-shot flash messages stored in a private cookie.
//!
//! A handler that redirects after a state change sets the flash cookie, and
//! the next rendered page pops and displays it.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

pub(crate) const FLASH_COOKIE: &str = "flash";

/// How a flash message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashLevel {
    /// A state change succeeded.
    Success,
    /// A state change succeeded with a caveat, e.g. a fallback value was used.
    Warning,
    /// A state change was rejected.
    Error,
}

impl FlashLevel {
    fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Error => "error",
        }
    }
}

/// A message displayed once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    /// How the message should be presented.
    pub level: FlashLevel,
    /// The message text.
    pub message: String,
}

impl Flash {
    /// A success flash.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    /// A warning flash.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    /// An error flash.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Add `flash` to the cookie jar so the next rendered page displays it.
pub fn set_flash(jar: PrivateCookieJar, flash: Flash) -> PrivateCookieJar {
    let value = match serde_json::to_string(&flash) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("could not serialize flash message: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict),
    )
}

/// Remove and return the pending flash message, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let flash = serde_json::from_str(cookie.value()).ok();
            let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
            (jar, flash)
        }
        None => (jar, None),
    }
}

/// Render the flash banner shown at the top of a page.
pub fn flash_banner(flash: &Option<Flash>) -> Markup {
    html! {
        @if let Some(flash) = flash {
            div class={ "flash flash-" (flash.level.css_class()) } role="alert" {
                (flash.message)
            }
        }
    }
}

#[cfg(test)]
mod flash_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};

    use super::{Flash, set_flash, take_flash};

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        PrivateCookieJar::new(Key::from(&hash))
    }

    #[test]
    fn set_then_take_round_trips() {
        let flash = Flash::success("Transaction created!");

        let jar = set_flash(get_jar(), flash.clone());
        let (jar, got) = take_flash(jar);

        assert_eq!(got, Some(flash));

        let (_, got_again) = take_flash(jar);
        assert_eq!(got_again, None);
    }

    #[test]
    fn take_on_empty_jar_returns_none() {
        let (_, got) = take_flash(get_jar());

        assert_eq!(got, None);
    }
}
