//! Register a new service.

use reqwest::Method;

use crate::blocking;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::models::{
    InvalidParameterValue, InvalidScopes, NotImplemented, ResourceAlreadyCreated,
    ServiceDescription, ServiceStatus,
};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the create-service endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: the newly registered service
    Ok(ServiceStatus),
    /// 400: malformed request
    BadRequest,
    /// 401: missing or invalid credentials
    Unauthorized,
    /// 403: insufficient scopes
    Forbidden(InvalidScopes),
    /// 409: a service with this provider reference already exists
    Conflict(ResourceAlreadyCreated),
    /// 422: a parameter failed validation
    UnprocessableEntity(InvalidParameterValue),
    /// 501: not supported by this deployment
    NotImplemented(NotImplemented),
    /// A status outside the endpoint's contract
    Unknown { status: u16, body: Vec<u8> },
}

pub fn request(description: &ServiceDescription) -> Result<RequestParts> {
    let body = serde_json::to_value(description)
        .map_err(|e| Error::json("service description", e))?;
    Ok(RequestParts::new(Method::POST, "1/services").json(body))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("service status")?),
        400 => Outcome::BadRequest,
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden(response.json("invalid scopes")?),
        409 => Outcome::Conflict(response.json("resource already created")?),
        422 => Outcome::UnprocessableEntity(response.json("invalid parameter value")?),
        501 => Outcome::NotImplemented(response.json("not implemented")?),
        status => Outcome::Unknown {
            status,
            body: response.body.clone(),
        },
    };
    Ok(outcome)
}

pub async fn call(client: &Client, description: &ServiceDescription) -> Result<Outcome> {
    let parts = request(description)?;
    let response = client.execute(parts).await?;
    parse(&response)
}

pub fn call_blocking(client: &blocking::Client, description: &ServiceDescription) -> Result<Outcome> {
    let parts = request(description)?;
    let response = client.execute(parts)?;
    parse(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_conflict() {
        let response = HttpResponse {
            status: 409,
            body: serde_json::to_vec(&json!({"id": "svc-9", "message": "already registered"}))
                .unwrap(),
        };
        let outcome = parse(&response).unwrap();
        assert!(matches!(outcome, Outcome::Conflict(ref e) if e.id.as_deref() == Some("svc-9")));
    }

    #[test]
    fn test_request_has_json_body() {
        let parts = request(&ServiceDescription::default()).unwrap();
        assert_eq!(parts.method, Method::POST);
        assert_eq!(parts.path, "1/services");
        assert_eq!(parts.body, Some(json!({})));
    }
}
