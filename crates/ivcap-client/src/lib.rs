//! # IVCAP Client
//!
//! Client SDK for the IVCAP service registry and artifact store.
//!
//! Every remote operation lives in its own module under [`api`], with a
//! typed outcome enum keyed by response status. Request building and
//! response parsing are shared between the async [`Client`] and the
//! [`blocking::Client`], so both entry points dispatch the exact same
//! request.
//!
//! ```no_run
//! use ivcap_client::{Client, ClientConfig};
//! use ivcap_client::api::service;
//! use ivcap_client::api::ListQuery;
//!
//! # #[tokio::main]
//! # async fn main() -> ivcap_client::Result<()> {
//! let client = Client::new(ClientConfig::parse("https://api.ivcap.net")?)?;
//! let outcome = service::list::call(&client, &ListQuery::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod blocking;
mod client;
pub mod config;
mod error;
pub mod models;
mod request;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use request::{HttpResponse, RequestParts};
