//! Session-backed flash messages for middleware pipelines.
//!
//! A flash message is a short-lived, typed string that is written during one
//! request cycle and consumed (read-and-cleared) on a later one — the
//! classic "set a notice, display it once" pattern. [`FlashMiddleware`]
//! installs a [`Flash`] capability on each request; the capability reads and
//! writes a kind-to-messages store kept inside the request's [`Session`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use flash_middleware::{
//! 	Flash, FlashMiddleware, Handler, Middleware, Request, Response, Session,
//! };
//! use hyper::Method;
//!
//! struct SaveHandler;
//!
//! #[async_trait::async_trait]
//! impl Handler for SaveHandler {
//! 	async fn handle(&self, request: Request) -> flash_middleware::Result<Response> {
//! 		let flash = request.flash().expect("installed by the middleware");
//! 		flash.add("info", "Profile saved")?;
//! 		Ok(Response::ok())
//! 	}
//! }
//!
//! struct ShowHandler;
//!
//! #[async_trait::async_trait]
//! impl Handler for ShowHandler {
//! 	async fn handle(&self, request: Request) -> flash_middleware::Result<Response> {
//! 		let flash = request.flash().expect("installed by the middleware");
//! 		// Reading drains the messages; they are gone on the next cycle.
//! 		assert_eq!(flash.take("info"), vec!["Profile saved"]);
//! 		assert!(flash.take("info").is_empty());
//! 		Ok(Response::ok())
//! 	}
//! }
//!
//! # tokio_test::block_on(async {
//! let middleware = FlashMiddleware::with_defaults();
//! let session = Session::new().shared();
//!
//! // First request cycle: a handler leaves a notice behind.
//! let request = Request::builder()
//! 	.method(Method::POST)
//! 	.uri("/profile")
//! 	.session(session.clone())
//! 	.build()
//! 	.unwrap();
//! middleware.process(request, Arc::new(SaveHandler)).await.unwrap();
//!
//! // Second request cycle, same session: the notice is displayed once.
//! let request = Request::builder()
//! 	.method(Method::GET)
//! 	.uri("/profile")
//! 	.session(session.clone())
//! 	.build()
//! 	.unwrap();
//! middleware.process(request, Arc::new(ShowHandler)).await.unwrap();
//! # });
//! ```

pub mod flash;
pub mod format;
pub mod http;
pub mod middleware;
pub mod session;

pub use flash::{Flash, FlashError, FlashStore, SessionFlash};
pub use http::{
	Error, Handler, Middleware, MiddlewareChain, Request, RequestBuilder, Response, Result,
};
pub use middleware::{FlashConfig, FlashMiddleware};
pub use session::{Session, SharedSession};
