//! Request/response vocabulary and the middleware composition seam.
//!
//! This module is the dispatch-collaborator interface the flash middleware
//! plugs into: a [`Request`] carrying an optional session and an optional
//! per-request flash capability, a [`Response`], and the [`Handler`] /
//! [`Middleware`] traits composed by [`MiddlewareChain`]. Middleware receives
//! the request together with the `next` handler and invokes it exactly once,
//! which plays the role of the continuation in callback-style pipelines.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::{HeaderMap, Method, StatusCode, Uri, Version};

use crate::flash::{Flash, FlashError};
use crate::session::SharedSession;

/// Pipeline-level error.
///
/// Handlers return this from [`Handler::handle`]; flash write failures
/// convert into it with `?`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A flash write was attempted on a request without a session
	#[error(transparent)]
	Flash(#[from] FlashError),

	/// A session value could not be (de)serialized
	#[error("serialization error: {0}")]
	Serialization(String),

	/// Failure inside a handler or the pipeline itself
	#[error("internal error: {0}")]
	Internal(String),
}

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// An incoming request.
///
/// Vocabulary fields are public, matching how handlers consume them. The
/// `session` field is attached by the session-management collaborator; the
/// flash capability slot is managed through [`Request::flash`] /
/// [`Request::set_flash`] and is populated by [`FlashMiddleware`] once per
/// request cycle.
///
/// [`FlashMiddleware`]: crate::middleware::FlashMiddleware
#[derive(Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Session for the requesting client, if the collaborator attached one
	pub session: Option<SharedSession>,
	flash: Option<Arc<dyn Flash>>,
}

impl Request {
	/// Create a request from its parts, with no session attached.
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			session: None,
			flash: None,
		}
	}

	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use flash_middleware::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	/// 	.method(Method::GET)
	/// 	.uri("/inbox")
	/// 	.build()
	/// 	.unwrap();
	/// assert_eq!(request.path(), "/inbox");
	/// assert!(request.flash().is_none());
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Path component of the request URI.
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// The flash capability installed on this request, if any.
	pub fn flash(&self) -> Option<&Arc<dyn Flash>> {
		self.flash.as_ref()
	}

	/// Whether a flash capability is already installed.
	pub fn has_flash(&self) -> bool {
		self.flash.is_some()
	}

	/// Install a flash capability, replacing any existing one.
	pub fn set_flash(&mut self, flash: Arc<dyn Flash>) {
		self.flash = Some(flash);
	}
}

impl fmt::Debug for Request {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Request")
			.field("method", &self.method)
			.field("uri", &self.uri)
			.field("version", &self.version)
			.field("has_session", &self.session.is_some())
			.field("has_flash", &self.flash.is_some())
			.finish()
	}
}

/// Builder for [`Request`].
///
/// Method defaults to `GET`, version to HTTP/1.1; the URI is required.
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<Uri>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	session: Option<SharedSession>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the URI. Accepts anything convertible into [`Uri`]; invalid
	/// values surface as an error from [`RequestBuilder::build`].
	pub fn uri<U>(mut self, uri: U) -> Self
	where
		U: TryInto<Uri>,
	{
		self.uri = uri.try_into().ok();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Attach the client's session.
	pub fn session(mut self, session: SharedSession) -> Self {
		self.session = Some(session);
		self
	}

	/// Build the request.
	///
	/// # Errors
	///
	/// Returns an error if the URI is missing or failed to parse.
	pub fn build(self) -> Result<Request> {
		let uri = self
			.uri
			.ok_or_else(|| Error::Internal("request uri is missing or invalid".to_string()))?;
		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers: self.headers,
			body: self.body,
			session: self.session,
			flash: None,
		})
	}
}

/// An outgoing response.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a response with the given status and an empty body.
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a `200 OK` response.
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Replace the body.
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}
}

/// Handler trait for processing requests.
///
/// All request endpoints implement this trait; middleware wraps it.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handle a request and produce a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Blanket implementation so `Arc<dyn Handler>` is itself a handler.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait: composition over inheritance.
///
/// A middleware may adjust the request, then must delegate to `next` —
/// the continuation — exactly once.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Process a request, delegating to the next handler in the chain.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or the next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;
}

/// Composes middleware around a terminal handler.
///
/// Middleware run in the order they were added, each wrapping the rest of
/// the chain.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use flash_middleware::{FlashMiddleware, Handler, MiddlewareChain, Request, Response};
/// use hyper::Method;
///
/// struct Endpoint;
///
/// #[async_trait::async_trait]
/// impl Handler for Endpoint {
/// 	async fn handle(&self, request: Request) -> flash_middleware::Result<Response> {
/// 		assert!(request.flash().is_some());
/// 		Ok(Response::ok())
/// 	}
/// }
///
/// # tokio_test::block_on(async {
/// let chain = MiddlewareChain::new(Arc::new(Endpoint))
/// 	.with_middleware(Arc::new(FlashMiddleware::with_defaults()));
/// let request = Request::builder()
/// 	.method(Method::GET)
/// 	.uri("/")
/// 	.build()
/// 	.unwrap();
/// let response = chain.handle(request).await.unwrap();
/// assert_eq!(response.status, hyper::StatusCode::OK);
/// # });
/// ```
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Create a chain around the given terminal handler.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Add a middleware, builder style.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Add a middleware.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self.middlewares.iter().rev() {
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}
		current.handle(request).await
	}
}

/// One middleware layered over the rest of the chain.
struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
