//! XDG Base Directory paths for leadtrack.
//!
//! The CLI keeps its simulated browser state (session storage and the
//! emitted event log) under the XDG data directory so repeated invocations
//! behave like page loads within one browser session.

use std::path::PathBuf;

/// File holding the session-scoped key/value store.
pub const SESSION_FILE: &str = "session.json";

/// File holding the JSON-lines log of emitted funnel events.
pub const EVENT_LOG_FILE: &str = "events.jsonl";

/// Get the leadtrack data directory.
///
/// Returns `$XDG_DATA_HOME/leadtrack` if set, otherwise `~/.local/share/leadtrack`.
///
/// # Examples
///
/// ```
/// use leadtrack_paths::data_dir;
///
/// let data = data_dir();
/// let file = data.join("session.json");
/// ```
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("leadtrack")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/leadtrack")
    } else {
        PathBuf::from(".local/share/leadtrack")
    }
}

/// Path of the session storage file inside [`data_dir`].
pub fn session_file() -> PathBuf {
    data_dir().join(SESSION_FILE)
}

/// Path of the event log inside [`data_dir`].
pub fn event_log_file() -> PathBuf {
    data_dir().join(EVENT_LOG_FILE)
}
