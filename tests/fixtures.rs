//! Shared test fixtures for flash-middleware tests
//!
//! Reusable request builders, sessions, handlers, and a stand-in flash
//! capability for override-policy tests. Fixtures are composed by the
//! scenario-specific test files via `mod fixtures;`.

// Fixtures are shared across several test binaries; not every binary uses
// every helper.
#![allow(dead_code)]
#![allow(unreachable_pub)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flash_middleware::{
	Flash, FlashError, FlashMiddleware, Handler, Middleware, Request, Response, Session,
	SharedSession,
};
use hyper::Method;

/// A fresh session wrapped in the shared handle requests carry.
pub fn fresh_session() -> SharedSession {
	Session::new().shared()
}

/// A GET request bound to the given session.
pub fn request_with_session(session: &SharedSession) -> Request {
	Request::builder()
		.method(Method::GET)
		.uri("/page")
		.session(session.clone())
		.build()
		.expect("fixture request is valid")
}

/// A GET request with no session attached.
pub fn request_without_session() -> Request {
	Request::builder()
		.method(Method::GET)
		.uri("/page")
		.build()
		.expect("fixture request is valid")
}

/// Handler that hands the installed capability back to the test.
///
/// Simulates application code: the middleware installs the capability, the
/// handler picks it up, and the test then exercises it the way a view
/// function would.
#[derive(Default)]
pub struct CapturingHandler {
	flash: Mutex<Option<Arc<dyn Flash>>>,
}

impl CapturingHandler {
	/// The capability captured during the last request, if any.
	pub fn captured(&self) -> Option<Arc<dyn Flash>> {
		self.flash.lock().unwrap().clone()
	}

	/// The capability captured during the last request.
	pub fn take_captured(&self) -> Arc<dyn Flash> {
		self.flash
			.lock()
			.unwrap()
			.take()
			.expect("handler ran and the request carried a flash capability")
	}
}

#[async_trait]
impl Handler for CapturingHandler {
	async fn handle(&self, request: Request) -> flash_middleware::Result<Response> {
		*self.flash.lock().unwrap() = request.flash().cloned();
		Ok(Response::ok())
	}
}

/// Run one request cycle through the middleware and return the capability
/// the downstream handler observed.
pub async fn install_and_capture(middleware: &FlashMiddleware, request: Request) -> Arc<dyn Flash> {
	let handler = Arc::new(CapturingHandler::default());
	middleware
		.process(request, handler.clone())
		.await
		.expect("installation never fails the pipeline");
	handler.take_captured()
}

/// Stand-in capability "installed by some other component".
///
/// Returns sentinel values so tests can tell whose semantics a request
/// ended up with.
pub struct StubFlash;

impl StubFlash {
	pub const SENTINEL_COUNT: usize = 42;
	pub const SENTINEL_MESSAGE: &'static str = "I exist";
}

impl Flash for StubFlash {
	fn take_all(&self) -> HashMap<String, Vec<String>> {
		HashMap::from([(
			"stub".to_string(),
			vec![Self::SENTINEL_MESSAGE.to_string()],
		)])
	}

	fn take(&self, _kind: &str) -> Vec<String> {
		vec![Self::SENTINEL_MESSAGE.to_string()]
	}

	fn add(&self, _kind: &str, _message: &str) -> Result<usize, FlashError> {
		Ok(Self::SENTINEL_COUNT)
	}

	fn add_all(&self, _kind: &str, _messages: &[&str]) -> Result<usize, FlashError> {
		Ok(Self::SENTINEL_COUNT)
	}
}
