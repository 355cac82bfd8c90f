//! List artifacts visible to the caller.

use reqwest::Method;

use crate::api::ListQuery;
use crate::blocking;
use crate::client::Client;
use crate::error::Result;
use crate::models::{ArtifactList, InvalidScopes, NotImplemented};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the list-artifacts endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: one page of artifacts
    Ok(ArtifactList),
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

pub fn request(query: &ListQuery) -> RequestParts {
    query.apply(RequestParts::new(Method::GET, "1/artifacts"))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("artifact list")?),
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

pub async fn call(client: &Client, query: &ListQuery) -> Result<Outcome> {
    let response = client.execute(request(query)).await?;
    parse(&response)
}

pub fn call_blocking(client: &blocking::Client, query: &ListQuery) -> Result<Outcome> {
    let response = client.execute(request(query))?;
    parse(&response)
}
