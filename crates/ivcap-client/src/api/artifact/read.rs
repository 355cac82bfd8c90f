//! Fetch a single artifact record by ID.
//!
//! Returns the artifact's registry record; the content itself is fetched
//! separately via the record's `data-href` link.

use reqwest::Method;

use crate::blocking;
use crate::client::Client;
use crate::error::Result;
use crate::models::{ArtifactStatus, InvalidScopes, NotImplemented, ResourceNotFound};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the read-artifact endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: the requested artifact record
    Ok(ArtifactStatus),
    /// 400: malformed request
    BadRequest,
    /// 401: missing or invalid credentials
    Unauthorized,
    /// 403: insufficient scopes
    Forbidden(InvalidScopes),
    /// 404: no artifact with the given ID
    NotFound(ResourceNotFound),
    /// 501: not supported by this deployment
    NotImplemented(NotImplemented),
    /// A status outside the endpoint's contract
    Unknown { status: u16, body: Vec<u8> },
}

pub fn request(id: &str) -> RequestParts {
    RequestParts::new(Method::GET, format!("1/artifacts/{id}"))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("artifact status")?),
        400 => Outcome::BadRequest,
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden(response.json("invalid scopes")?),
        404 => Outcome::NotFound(response.json("resource not found")?),
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
