//! # API Module
//!
//! HTTP endpoints of the short-lived local server used during `seasonify auth`.
//!
//! - [`callback`] - receives Spotify's OAuth redirect, exchanges the
//!   authorization code with the PKCE verifier and stores the token in the
//!   shared state the auth flow is polling.
//!
//! The server is started right before the browser opens and shut down as soon
//! as a token arrives, see [`crate::server`].
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use seasonify::api::callback;
//!
//! let app = Router::new().route("/callback", get(callback));
//! ```

mod callback;

pub use callback::callback;
