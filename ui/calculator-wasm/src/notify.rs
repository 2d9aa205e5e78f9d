//! Notification banners.

use gloo_timers::callback::Timeout;

use crate::dom::{self, Elements};

const DISMISS_AFTER_MS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Danger,
}

impl Level {
    fn class(self) -> &'static str {
        match self {
            Level::Success => "alert-success",
            Level::Danger => "alert-danger",
        }
    }
}

pub fn show(els: &Elements, message: &str, level: Level) {
    let Ok(banner) = dom::create_element("div") else {
        gloo_console::error!(format!("notification: {message}"));
        return;
    };
    dom::add_class(&banner, "alert");
    dom::add_class(&banner, level.class());
    let _ = banner.set_attribute("role", "alert");
    dom::set_text(&banner, message);

    if els.notifications.append_child(&banner).is_err() {
        return;
    }
    Timeout::new(DISMISS_AFTER_MS, move || banner.remove()).forget();
}
