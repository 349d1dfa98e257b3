//! Navigation side effects triggered by the session lifecycle

use std::sync::Mutex;
use tracing::info;

/// Entry point the application is sent to when the session ends
pub const LOGIN_PATH: &str = "/login";

/// Something that can move the application to another route
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Records every navigation instead of performing it
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All paths navigated to, oldest first
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }

    /// How many times `path` was navigated to
    pub fn count(&self, path: &str) -> usize {
        self.visits().iter().filter(|visit| *visit == path).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_string());
        }
    }
}

/// Navigator for terminal front ends, where a route change is a log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        if path == LOGIN_PATH {
            info!("Session ended; log in again to continue");
        } else {
            info!(path, "Navigating");
        }
    }
}

/// Full page navigation through `window.location`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().set_href(path).is_err() {
                tracing::warn!(path, "Failed to change location");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_counts_visits() {
        let nav = RecordingNavigator::new();
        nav.navigate(LOGIN_PATH);
        nav.navigate("/cart");
        nav.navigate(LOGIN_PATH);

        assert_eq!(nav.visits(), vec!["/login", "/cart", "/login"]);
        assert_eq!(nav.count(LOGIN_PATH), 2);
    }
}
