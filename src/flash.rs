//! The flash store and the per-request flash capability.
//!
//! [`FlashStore`] is the kind-to-messages map kept inside a session.
//! [`Flash`] is the capability installed on each request; [`SessionFlash`]
//! is its session-backed implementation. Reads drain: taking a kind's
//! messages removes them from the store in the same operation.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLockWriteGuard;

use serde::{Deserialize, Serialize};

use crate::format::interpolate;
use crate::session::{Session, SharedSession};

/// Error raised by write-mode flash operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlashError {
	/// The request carries no session to store messages into
	#[error("request has no session to store flash messages into")]
	MissingSession,
}

/// Pending flash messages, grouped by kind.
///
/// Kinds are short labels such as `"error"` or `"info"`. A kind is only
/// present while it has at least one message: draining a kind removes its
/// key, and appending an empty sequence creates nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashStore {
	#[serde(flatten)]
	messages: HashMap<String, Vec<String>>,
}

impl FlashStore {
	/// Append one message, returning the total now stored under `kind`.
	pub fn push(&mut self, kind: &str, message: impl Into<String>) -> usize {
		let slot = self.messages.entry(kind.to_string()).or_default();
		slot.push(message.into());
		slot.len()
	}

	/// Append messages in order, returning the total now stored under
	/// `kind`. An empty sequence leaves the store untouched.
	pub fn extend<I, S>(&mut self, kind: &str, messages: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut messages = messages.into_iter().peekable();
		if messages.peek().is_none() {
			return self.count(kind);
		}
		let slot = self.messages.entry(kind.to_string()).or_default();
		slot.extend(messages.map(Into::into));
		slot.len()
	}

	/// Remove and return all messages of one kind. Other kinds are
	/// untouched; an absent kind yields an empty vec.
	pub fn take(&mut self, kind: &str) -> Vec<String> {
		self.messages.remove(kind).unwrap_or_default()
	}

	/// Remove and return everything, leaving the store empty.
	pub fn take_all(&mut self) -> HashMap<String, Vec<String>> {
		std::mem::take(&mut self.messages)
	}

	/// Messages currently stored under `kind`.
	pub fn count(&self, kind: &str) -> usize {
		self.messages.get(kind).map_or(0, Vec::len)
	}

	/// Kinds with at least one pending message.
	pub fn kinds(&self) -> impl Iterator<Item = &str> {
		self.messages.keys().map(String::as_str)
	}

	/// Number of kinds with pending messages.
	pub fn len(&self) -> usize {
		self.messages.len()
	}

	/// Whether no messages are pending at all.
	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	/// Consume the store into its underlying map.
	pub fn into_messages(self) -> HashMap<String, Vec<String>> {
		self.messages
	}
}

/// Per-request flash capability.
///
/// Installed on each request by
/// [`FlashMiddleware`](crate::middleware::FlashMiddleware). Write operations
/// require a session and fail synchronously without one; read operations
/// degrade to empty results instead. All operations complete on the calling
/// task with no suspension.
pub trait Flash: Send + Sync {
	/// Drain every kind at once, returning a snapshot of the whole store.
	/// Empty if nothing was pending.
	fn take_all(&self) -> HashMap<String, Vec<String>>;

	/// Drain one kind, leaving the others untouched. Empty if the kind has
	/// no pending messages; never an error.
	fn take(&self, kind: &str) -> Vec<String>;

	/// Append one message.
	///
	/// # Errors
	///
	/// [`FlashError::MissingSession`] if the request has no session.
	fn add(&self, kind: &str, message: &str) -> Result<usize, FlashError>;

	/// Append a sequence of messages in order.
	///
	/// # Errors
	///
	/// [`FlashError::MissingSession`] if the request has no session.
	fn add_all(&self, kind: &str, messages: &[&str]) -> Result<usize, FlashError>;

	/// Append one message built from a `%s` template and positional
	/// arguments (see [`crate::format::interpolate`]).
	///
	/// # Errors
	///
	/// [`FlashError::MissingSession`] if the request has no session.
	fn add_format(
		&self,
		kind: &str,
		template: &str,
		args: &[&dyn fmt::Display],
	) -> Result<usize, FlashError> {
		self.add(kind, &interpolate(template, args))
	}
}

/// Session-backed [`Flash`] implementation.
///
/// Bound to one request's session at installation time. A request without a
/// session still gets a capability (installation never fails); only writes
/// observe the absence.
///
/// # Examples
///
/// ```
/// use flash_middleware::{Flash, Session, SessionFlash};
///
/// let session = Session::new().shared();
/// let flash = SessionFlash::new(Some(session.clone()));
///
/// assert_eq!(flash.add("info", "saved"), Ok(1));
/// assert_eq!(flash.take("info"), vec!["saved"]);
/// assert!(session.read().unwrap().flash().is_none());
/// ```
pub struct SessionFlash {
	session: Option<SharedSession>,
}

impl SessionFlash {
	/// Bind a capability to the given session, or to none.
	pub fn new(session: Option<SharedSession>) -> Self {
		Self { session }
	}

	fn write_session(&self) -> Result<RwLockWriteGuard<'_, Session>, FlashError> {
		let session = self.session.as_ref().ok_or(FlashError::MissingSession)?;
		Ok(session.write().unwrap_or_else(|e| e.into_inner()))
	}
}

impl Flash for SessionFlash {
	fn take_all(&self) -> HashMap<String, Vec<String>> {
		let Some(session) = &self.session else {
			return HashMap::new();
		};
		let mut session = session.write().unwrap_or_else(|e| e.into_inner());
		session
			.take_flash()
			.map(FlashStore::into_messages)
			.unwrap_or_default()
	}

	fn take(&self, kind: &str) -> Vec<String> {
		let Some(session) = &self.session else {
			return Vec::new();
		};
		let mut session = session.write().unwrap_or_else(|e| e.into_inner());
		let messages = session
			.flash_opt_mut()
			.map(|store| store.take(kind))
			.unwrap_or_default();
		session.normalize_flash();
		messages
	}

	fn add(&self, kind: &str, message: &str) -> Result<usize, FlashError> {
		let mut session = self.write_session()?;
		Ok(session.flash_mut().push(kind, message))
	}

	fn add_all(&self, kind: &str, messages: &[&str]) -> Result<usize, FlashError> {
		let mut session = self.write_session()?;
		if messages.is_empty() {
			// Nothing to append: report the current count without creating
			// a store or a key.
			return Ok(session.flash().map_or(0, |store| store.count(kind)));
		}
		Ok(session.flash_mut().extend(kind, messages.iter().copied()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::Session;

	#[test]
	fn test_store_push_counts_total() {
		let mut store = FlashStore::default();
		assert_eq!(store.push("error", "one"), 1);
		assert_eq!(store.push("error", "two"), 2);
		assert_eq!(store.count("error"), 2);
	}

	#[test]
	fn test_store_take_removes_key() {
		let mut store = FlashStore::default();
		store.push("error", "boom");
		store.push("info", "fine");

		assert_eq!(store.take("error"), vec!["boom"]);
		assert_eq!(store.len(), 1);
		assert_eq!(store.count("error"), 0);
		assert_eq!(store.count("info"), 1);
	}

	#[test]
	fn test_store_extend_empty_creates_no_key() {
		let mut store = FlashStore::default();
		assert_eq!(store.extend("warning", Vec::<String>::new()), 0);
		assert!(store.is_empty());

		store.push("warning", "low disk");
		assert_eq!(store.extend("warning", Vec::<String>::new()), 1);
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_store_take_all_drains() {
		let mut store = FlashStore::default();
		store.push("a", "1");
		store.push("b", "2");

		let all = store.take_all();
		assert_eq!(all.len(), 2);
		assert!(store.is_empty());
	}

	#[test]
	fn test_capability_write_then_drain() {
		let session = Session::new().shared();
		let flash = SessionFlash::new(Some(session.clone()));

		assert_eq!(flash.add("error", "Something went wrong"), Ok(1));
		assert_eq!(session.read().unwrap().flash().unwrap().len(), 1);

		assert_eq!(flash.take("error"), vec!["Something went wrong"]);
		assert!(flash.take("error").is_empty());
		assert!(session.read().unwrap().flash().is_none());
	}

	#[test]
	fn test_capability_bulk_write() {
		let session = Session::new().shared();
		let flash = SessionFlash::new(Some(session));

		let count = flash
			.add_all("warning", &["username required", "password required"])
			.unwrap();
		assert_eq!(count, 2);
		assert_eq!(
			flash.take("warning"),
			vec!["username required", "password required"]
		);
	}

	#[test]
	fn test_capability_format_write() {
		let session = Session::new().shared();
		let flash = SessionFlash::new(Some(session));

		flash
			.add_format("info", "Hello %s", &[&"Jared"])
			.unwrap();
		assert_eq!(flash.take("info"), vec!["Hello Jared"]);
	}

	#[test]
	fn test_writes_require_a_session() {
		let flash = SessionFlash::new(None);

		assert_eq!(
			flash.add("error", "boom"),
			Err(FlashError::MissingSession)
		);
		assert_eq!(
			flash.add_all("error", &["boom"]),
			Err(FlashError::MissingSession)
		);
		assert_eq!(
			flash.add_format("error", "%s", &[&"boom"]),
			Err(FlashError::MissingSession)
		);
	}

	#[test]
	fn test_reads_without_a_session_are_empty() {
		let flash = SessionFlash::new(None);

		assert!(flash.take("error").is_empty());
		assert!(flash.take_all().is_empty());
	}
}
