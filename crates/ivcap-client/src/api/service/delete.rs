//! Remove a service from the registry.

use reqwest::Method;

use crate::blocking;
use crate::client::Client;
use crate::error::Result;
use crate::models::{InvalidScopes, NotImplemented};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the delete-service endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 204: deleted (or was never there; deletion is idempotent)
    NoContent,
    /// 400: malformed request
    BadRequest,
    /// 401: missing or invalid credentials
    Unauthorized,
    /// 403: insufficient scopes
    Forbidden(InvalidScopes),
    /// 501: not supported by this deployment
    NotImplemented(NotImplemented),
    /// A status outside the endpoint's contract
    Unknown { status: u16, body: Vec<u8> },
}

pub fn request(id: &str) -> RequestParts {
    RequestParts::new(Method::DELETE, format!("1/services/{id}"))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        204 => Outcome::NoContent,
        400 => Outcome::BadRequest,
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden(response.json("invalid scopes")?),
        501 => Outcome::NotImplemented(response.json("not implemented")?),
        status => Outcome::Unknown {
            status,
            body: response.body.clone(),
        },
    };
    Ok(outcome)
}

pub async fn call(client: &Client, id: &str) -> Result<Outcome> {
    let response = client.execute(request(id)).await?;
    parse(&response)
}

pub fn call_blocking(client: &blocking::Client, id: &str) -> Result<Outcome> {
    let response = client.execute(request(id))?;
    parse(&response)
}
