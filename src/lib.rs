//! # Ahana
//!
//! School nurse portal: a thin client over the Ahana REST backend for student
//! health records, health assessments, infirmary visits and the medicine
//! inventory.
//!
//! ## Modules
//!
//! - [`client`]: shared REST client, pluggable [`client::Transport`]
//! - [`session`]: persisted tokens, user and auth flag
//! - [`model`]: backend records and query parameters
//! - [`services`]: one module of endpoint calls per backend area
//! - [`forms`]: form state, validation and payload building
//! - [`listing`]: paging, search, filter drafts and delete confirmation
//! - [`auth_flow`]: the three-step password reset wizard
//! - [`reports`]: infirmary report filters and CSV export
//! - [`routes`]: portal routes and the authentication guard
//!
//! With the default `native` feature the crate also carries the `ahana` CLI
//! ([`cli`]) and the `ahana-portal` gateway ([`gateway`]). The browser client
//! (`ahana-ui`) builds against this crate with default features off.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ahana::client::{ApiClient, ReqwestTransport, DEFAULT_BASE_URL};
//! use ahana::model::Credentials;
//! use ahana::services::{auth, nurses};
//! use ahana::session::MemorySessionStore;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new(Duration::from_secs(30))?;
//!     let client = ApiClient::new(DEFAULT_BASE_URL, transport, MemorySessionStore::default());
//!
//!     let credentials = Credentials {
//!         email: "nurse@school.in".into(),
//!         password: "secret".into(),
//!     };
//!     auth::login(&client, &credentials).await?;
//!     let stats = nurses::stats(&client).await?;
//!     println!("{} students", stats.students);
//!     Ok(())
//! }
//! ```

pub mod auth_flow;
pub mod client;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod listing;
pub mod model;
pub mod reports;
pub mod routes;
pub mod services;
pub mod session;

#[cfg(feature = "native")]
pub mod cli;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod gateway;
#[cfg(feature = "native")]
pub mod logging;

pub use client::{ApiClient, Transport};
pub use error::{ClientError, ClientResult, ValidationErrors};
pub use routes::{Guard, Route};
pub use session::{NurseSession, Session, SessionStore};
