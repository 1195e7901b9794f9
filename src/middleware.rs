//! Flash middleware: installs the per-request flash capability.
//!
//! The middleware runs once per request before downstream handling. It binds
//! a [`SessionFlash`] to the request's session and attaches it, unless the
//! request already carries a capability and the configuration says to defer
//! to it. Installation cannot fail and performs no asynchronous work; the
//! only `await` is delegation to the next handler.

use std::sync::Arc;

use async_trait::async_trait;

use crate::flash::SessionFlash;
use crate::http::{Handler, Middleware, Request, Response, Result};

/// Flash middleware configuration.
///
/// One recognized option. `overwrite` decides what happens when a request
/// already carries a flash capability installed by an upstream or
/// alternative component: `false` (the default) leaves it untouched, `true`
/// replaces it with this crate's implementation. The value is captured
/// immutably when the middleware is constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashConfig {
	/// Replace a pre-existing flash capability instead of deferring to it
	pub overwrite: bool,
}

impl FlashConfig {
	/// Create the default configuration (`overwrite: false`).
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the overwrite policy.
	///
	/// # Examples
	///
	/// ```
	/// use flash_middleware::FlashConfig;
	///
	/// let config = FlashConfig::new().with_overwrite(true);
	/// assert!(config.overwrite);
	/// ```
	pub fn with_overwrite(mut self, overwrite: bool) -> Self {
		self.overwrite = overwrite;
		self
	}
}

/// Middleware that attaches a [`Flash`](crate::flash::Flash) capability to
/// each request.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use flash_middleware::{
/// 	Flash, FlashConfig, FlashMiddleware, Handler, Middleware, Request, Response, Session,
/// };
/// use hyper::Method;
///
/// struct Greeter;
///
/// #[async_trait::async_trait]
/// impl Handler for Greeter {
/// 	async fn handle(&self, request: Request) -> flash_middleware::Result<Response> {
/// 		let flash = request.flash().expect("installed by the middleware");
/// 		flash.add("info", "Welcome back")?;
/// 		assert_eq!(flash.take("info"), vec!["Welcome back"]);
/// 		Ok(Response::ok())
/// 	}
/// }
///
/// # tokio_test::block_on(async {
/// let middleware = FlashMiddleware::new(FlashConfig::new());
/// let request = Request::builder()
/// 	.method(Method::GET)
/// 	.uri("/greet")
/// 	.session(Session::new().shared())
/// 	.build()
/// 	.unwrap();
///
/// let response = middleware.process(request, Arc::new(Greeter)).await.unwrap();
/// assert_eq!(response.status, hyper::StatusCode::OK);
/// # });
/// ```
pub struct FlashMiddleware {
	config: FlashConfig,
}

impl FlashMiddleware {
	/// Create a middleware with the given configuration.
	pub fn new(config: FlashConfig) -> Self {
		Self { config }
	}

	/// Create a middleware with the default configuration.
	pub fn with_defaults() -> Self {
		Self::new(FlashConfig::default())
	}
}

impl Default for FlashMiddleware {
	fn default() -> Self {
		Self::with_defaults()
	}
}

#[async_trait]
impl Middleware for FlashMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		if request.has_flash() && !self.config.overwrite {
			tracing::trace!(
				path = %request.path(),
				"flash capability already present, leaving it in place"
			);
			return next.handle(request).await;
		}

		tracing::trace!(
			path = %request.path(),
			has_session = request.session.is_some(),
			replaced = request.has_flash(),
			"installing flash capability"
		);
		request.set_flash(Arc::new(SessionFlash::new(request.session.clone())));
		next.handle(request).await
	}
}
