//! History integration.
//!
//! The router reads and writes the address through a [`HistoryProvider`] and
//! publishes titles through a [`Document`]. Both are traits so the same router
//! runs in a browser (see the `web` feature) and in memory for tests or
//! non-browser hosts.
//!
//! ```
//! use spa_navigator::{HistoryProvider, MemoryHistory};
//! use serde_json::json;
//!
//! let mut history = MemoryHistory::default();
//! assert_eq!(history.current_url().path(), "/");
//!
//! let next = history.current_url().join("/login?next=home").unwrap();
//! history.push_state(json!({ "route": "/login" }), &next).unwrap();
//! assert_eq!(history.current_url().path(), "/login");
//! assert_eq!(history.current_url().query(), Some("next=home"));
//!
//! history.go_back();
//! assert_eq!(history.current_url().path(), "/");
//! ```

use crate::error::HistoryError;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

/// Opaque payload stored with a history entry.
pub type HistoryState = Value;

/// Origin used by [`MemoryHistory`].
pub const MEMORY_ORIGIN: &str = "http://localhost/";

/// State recorded when the caller does not supply one.
pub fn default_state(path: &str) -> HistoryState {
    json!({ "route": path })
}

// ============================================================================
// Traits
// ============================================================================

/// An integration with some kind of navigation history.
pub trait HistoryProvider {
    /// The current absolute address.
    fn current_url(&self) -> Url;

    /// Payload of the current entry, if any.
    fn state(&self) -> Option<HistoryState>;

    /// Add an entry and make it current, dropping any forward entries.
    fn push_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError>;

    /// Overwrite the current entry.
    fn replace_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError>;
}

/// The document surface the router publishes to.
pub trait Document {
    /// Set the visible title.
    fn set_title(&mut self, title: &str);

    /// Replace the page with a minimal error surface.
    ///
    /// Only called when even the not-found view cannot be shown.
    fn render_fatal_error(&mut self, message: &str);
}

// ============================================================================
// Token side channel
// ============================================================================

/// Remove a non-blank `param` from the query of `url`.
///
/// Returns the cleaned URL and the token value, or `None` when there is
/// nothing to strip. Other parameters and the fragment are kept.
pub fn strip_query_param(url: &Url, param: &str) -> Option<(Url, String)> {
    let token = url
        .query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())?;
    if token.trim().is_empty() {
        return None;
    }

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut cleaned = url.clone();
    if remaining.is_empty() {
        cleaned.set_query(None);
    } else {
        cleaned.query_pairs_mut().clear().extend_pairs(remaining);
    }
    Some((cleaned, token))
}

// ============================================================================
// MemoryHistory
// ============================================================================

#[derive(Debug, Clone)]
struct Entry {
    url: Url,
    state: Option<HistoryState>,
}

#[derive(Debug)]
struct MemoryStack {
    entries: Vec<Entry>,
    current: usize,
}

/// A [`HistoryProvider`] that keeps every entry in memory.
///
/// Cloning yields another handle to the same stack, so a test can hand one
/// handle to the router and keep one to inspect or drive back/forward.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Rc<RefCell<MemoryStack>>,
}

impl MemoryHistory {
    /// Start at `path` (which may carry a query and fragment) on [`MEMORY_ORIGIN`].
    ///
    /// An unparsable path falls back to the origin root.
    pub fn new(path: &str) -> Self {
        let origin = Url::parse(MEMORY_ORIGIN).expect("memory origin is a valid URL");
        let url = origin.join(path).unwrap_or(origin);
        Self {
            stack: Rc::new(RefCell::new(MemoryStack {
                entries: vec![Entry { url, state: None }],
                current: 0,
            })),
        }
    }

    /// Move to the previous entry, like the browser back button.
    ///
    /// Returns `false` when already at the first entry.
    pub fn go_back(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.current == 0 {
            return false;
        }
        stack.current -= 1;
        true
    }

    /// Move to the next entry, like the browser forward button.
    pub fn go_forward(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.current + 1 >= stack.entries.len() {
            return false;
        }
        stack.current += 1;
        true
    }

    /// Check if there is an entry to go back to
    pub fn can_go_back(&self) -> bool {
        self.stack.borrow().current > 0
    }

    /// Check if there is an entry to go forward to
    pub fn can_go_forward(&self) -> bool {
        let stack = self.stack.borrow();
        stack.current + 1 < stack.entries.len()
    }

    /// Number of entries, including forward entries
    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    /// Whether the stack is empty. Never true; there is always a current entry.
    pub fn is_empty(&self) -> bool {
        self.stack.borrow().entries.is_empty()
    }

    /// Current path, query and fragment, without the origin.
    pub fn location(&self) -> String {
        let url = self.current_url();
        let mut location = url.path().to_string();
        if let Some(query) = url.query() {
            location.push('?');
            location.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            location.push('#');
            location.push_str(fragment);
        }
        location
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryProvider for MemoryHistory {
    fn current_url(&self) -> Url {
        let stack = self.stack.borrow();
        stack.entries[stack.current].url.clone()
    }

    fn state(&self) -> Option<HistoryState> {
        let stack = self.stack.borrow();
        stack.entries[stack.current].state.clone()
    }

    fn push_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError> {
        let mut stack = self.stack.borrow_mut();
        let keep = stack.current + 1;
        stack.entries.truncate(keep);
        stack.entries.push(Entry {
            url: url.clone(),
            state: Some(state),
        });
        stack.current += 1;
        Ok(())
    }

    fn replace_state(&mut self, state: HistoryState, url: &Url) -> Result<(), HistoryError> {
        let mut stack = self.stack.borrow_mut();
        let current = stack.current;
        stack.entries[current] = Entry {
            url: url.clone(),
            state: Some(state),
        };
        Ok(())
    }
}

// ============================================================================
// MemoryDocument
// ============================================================================

#[derive(Debug, Default)]
struct DocumentRecord {
    titles: Vec<String>,
    fatal_error: Option<String>,
}

/// A [`Document`] that records what the router published.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    record: Rc<RefCell<DocumentRecord>>,
}

impl MemoryDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently set title
    pub fn title(&self) -> Option<String> {
        self.record.borrow().titles.last().cloned()
    }

    /// Every title set so far, oldest first
    pub fn titles(&self) -> Vec<String> {
        self.record.borrow().titles.clone()
    }

    /// Message of the hard-error surface, if it was rendered
    pub fn fatal_error(&self) -> Option<String> {
        self.record.borrow().fatal_error.clone()
    }
}

impl Document for MemoryDocument {
    fn set_title(&mut self, title: &str) {
        self.record.borrow_mut().titles.push(title.to_string());
    }

    fn render_fatal_error(&mut self, message: &str) {
        self.record.borrow_mut().fatal_error = Some(message.to_string());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn url(history: &MemoryHistory, path: &str) -> Url {
        history.current_url().join(path).unwrap()
    }

    #[test]
    fn test_push_and_back_forward() {
        let mut history = MemoryHistory::default();
        let users = url(&history, "/users");
        history.push_state(default_state("/users"), &users).unwrap();
        let posts = url(&history, "/posts");
        history.push_state(default_state("/posts"), &posts).unwrap();

        assert_eq!(history.location(), "/posts");
        assert!(history.go_back());
        assert_eq!(history.location(), "/users");
        assert_eq!(history.state(), Some(json!({ "route": "/users" })));
        assert!(history.go_forward());
        assert_eq!(history.location(), "/posts");
        assert!(!history.go_forward());
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = MemoryHistory::default();
        let a = url(&history, "/a");
        history.push_state(default_state("/a"), &a).unwrap();
        history.go_back();
        let b = url(&history, "/b");
        history.push_state(default_state("/b"), &b).unwrap();

        assert_eq!(history.len(), 2);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_replace_keeps_length() {
        let mut history = MemoryHistory::new("/start");
        let next = url(&history, "/next");
        history.replace_state(default_state("/next"), &next).unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.location(), "/next");
        assert!(!history.can_go_back());
    }

    #[test]
    fn test_handles_share_the_stack() {
        let mut history = MemoryHistory::default();
        let observer = history.clone();
        let next = url(&history, "/next");
        history.push_state(default_state("/next"), &next).unwrap();
        assert_eq!(observer.location(), "/next");
    }

    #[test]
    fn test_strip_token_keeps_other_params_and_fragment() {
        let url = Url::parse("http://localhost/home?token=abc&tab=2#top").unwrap();
        let (cleaned, token) = strip_query_param(&url, "token").unwrap();
        assert_eq!(token, "abc");
        assert_eq!(cleaned.as_str(), "http://localhost/home?tab=2#top");
    }

    #[test]
    fn test_strip_only_param_removes_query() {
        let url = Url::parse("http://localhost/home?token=abc").unwrap();
        let (cleaned, _) = strip_query_param(&url, "token").unwrap();
        assert_eq!(cleaned.as_str(), "http://localhost/home");
    }

    #[test]
    fn test_blank_or_missing_token_is_left_alone() {
        let blank = Url::parse("http://localhost/home?token=%20").unwrap();
        assert!(strip_query_param(&blank, "token").is_none());
        let missing = Url::parse("http://localhost/home?tab=2").unwrap();
        assert!(strip_query_param(&missing, "token").is_none());
    }

    #[test]
    fn test_memory_document_records() {
        let mut document = MemoryDocument::new();
        let observer = document.clone();
        document.set_title("Home");
        document.set_title("Login");
        document.render_fatal_error("Error loading page");

        assert_eq!(observer.title().as_deref(), Some("Login"));
        assert_eq!(observer.titles(), vec!["Home", "Login"]);
        assert_eq!(observer.fatal_error().as_deref(), Some("Error loading page"));
    }
}
