//! Session seam consumed by the flash capability.
//!
//! A [`Session`] is owned by an external session-management collaborator: it
//! is created per logical client, survives across request cycles, and is
//! attached to each [`Request`](crate::http::Request) as a [`SharedSession`].
//! This component only relies on the session being mutable and able to carry
//! the flash store; the general key/value data map exists for the rest of the
//! application.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flash::FlashStore;
use crate::http::{Error, Result};

/// Shared, mutable handle to a session.
///
/// One logical owner mutates it per in-flight request cycle; the lock exists
/// to satisfy `Send + Sync` bounds, not to arbitrate concurrent writers.
pub type SharedSession = Arc<RwLock<Session>>;

/// Per-client session data.
///
/// # Examples
///
/// ```
/// use flash_middleware::Session;
///
/// let mut session = Session::new();
/// session.set("user_id", 42).unwrap();
/// assert_eq!(session.get::<i32>("user_id"), Some(42));
/// assert!(session.flash().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
	id: String,
	data: HashMap<String, serde_json::Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	flash: Option<FlashStore>,
}

impl Session {
	/// Create an empty session with a fresh id.
	pub fn new() -> Self {
		Self {
			id: Uuid::new_v4().to_string(),
			data: HashMap::new(),
			flash: None,
		}
	}

	/// Session id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Wrap the session in the shared handle requests carry.
	pub fn shared(self) -> SharedSession {
		Arc::new(RwLock::new(self))
	}

	/// Get a value from the data map.
	pub fn get<T>(&self, key: &str) -> Option<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.data
			.get(key)
			.and_then(|v| serde_json::from_value(v.clone()).ok())
	}

	/// Set a value in the data map.
	///
	/// # Errors
	///
	/// Returns an error if the value cannot be serialized.
	pub fn set<T>(&mut self, key: impl Into<String>, value: T) -> Result<()>
	where
		T: Serialize,
	{
		let value =
			serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))?;
		self.data.insert(key.into(), value);
		Ok(())
	}

	/// Remove a value from the data map.
	pub fn delete(&mut self, key: &str) {
		self.data.remove(key);
	}

	/// Whether the data map holds the given key.
	pub fn contains_key(&self, key: &str) -> bool {
		self.data.contains_key(key)
	}

	/// Clear all session state, flash store included.
	pub fn clear(&mut self) {
		self.data.clear();
		self.flash = None;
	}

	/// The flash store, if any messages are pending.
	///
	/// `None` until the first flash write, and again once every message has
	/// been drained.
	pub fn flash(&self) -> Option<&FlashStore> {
		self.flash.as_ref()
	}

	/// The flash store, created lazily on first write.
	pub(crate) fn flash_mut(&mut self) -> &mut FlashStore {
		self.flash.get_or_insert_with(FlashStore::default)
	}

	/// The flash store, without creating one.
	pub(crate) fn flash_opt_mut(&mut self) -> Option<&mut FlashStore> {
		self.flash.as_mut()
	}

	/// Detach the whole flash store.
	pub(crate) fn take_flash(&mut self) -> Option<FlashStore> {
		self.flash.take()
	}

	/// Drop the store again once a drain has emptied it.
	pub(crate) fn normalize_flash(&mut self) {
		if self.flash.as_ref().is_some_and(FlashStore::is_empty) {
			self.flash = None;
		}
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}
