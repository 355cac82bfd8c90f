//! Update an existing service and return its status.

use reqwest::Method;

use crate::blocking;
use crate::client::Client;
use crate::error::{Error, Result};
use crate::models::{
    InvalidParameterValue, InvalidScopes, NotImplemented, ResourceNotFound, ServiceDescription,
    ServiceStatus,
};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the update-service endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: the updated service
    Ok(ServiceStatus),
    /// 400: malformed request
    BadRequest,
    /// 401: missing or invalid credentials
    Unauthorized,
    /// 403: insufficient scopes
    Forbidden(InvalidScopes),
    /// 404: no service with the given ID
    NotFound(ResourceNotFound),
    /// 422: a parameter failed validation
    UnprocessableEntity(InvalidParameterValue),
    /// 501: not supported by this deployment
    NotImplemented(NotImplemented),
    /// A status outside the endpoint's contract
    Unknown { status: u16, body: Vec<u8> },
}

pub fn request(
    id: &str,
    description: &ServiceDescription,
    force_create: Option<bool>,
) -> Result<RequestParts> {
    let body = serde_json::to_value(description)
        .map_err(|e| Error::json("service description", e))?;
    Ok(RequestParts::new(Method::PUT, format!("1/services/{id}"))
        .query_opt("force-create", force_create)
        .json(body))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("service status")?),
        400 => Outcome::BadRequest,
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden(response.json("invalid scopes")?),
        404 => Outcome::NotFound(response.json("resource not found")?),
        422 => Outcome::UnprocessableEntity(response.json("invalid parameter value")?),
        501 => Outcome::NotImplemented(response.json("not implemented")?),
        status => Outcome::Unknown {
            status,
            body: response.body.clone(),
        },
    };
    Ok(outcome)
}

pub async fn call(
    client: &Client,
    id: &str,
    description: &ServiceDescription,
    force_create: Option<bool>,
) -> Result<Outcome> {
    let parts = request(id, description, force_create)?;
    let response = client.execute(parts).await?;
    parse(&response)
}

pub fn call_blocking(
    client: &blocking::Client,
    id: &str,
    description: &ServiceDescription,
    force_create: Option<bool>,
) -> Result<Outcome> {
    let parts = request(id, description, force_create)?;
    let response = client.execute(parts)?;
    parse(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse {
            status,
            body: serde_json::to_vec(&body).unwrap(),
        }
    }

    #[test]
    fn test_request_shape() {
        let description = ServiceDescription {
            name: Some("fire-risk".to_string()),
            ..Default::default()
        };
        let parts = request("svc-1", &description, Some(true)).unwrap();

        assert_eq!(parts.method, Method::PUT);
        assert_eq!(parts.path, "1/services/svc-1");
        assert_eq!(parts.query, vec![("force-create", "true".to_string())]);
        assert_eq!(parts.body, Some(json!({"name": "fire-risk"})));
    }

    #[test]
    fn test_parse_ok() {
        let outcome = parse(&response(200, json!({"id": "svc-1", "status": "active"}))).unwrap();
        match outcome {
            Outcome::Ok(status) => {
                assert_eq!(status.id.as_deref(), Some("svc-1"));
                assert_eq!(status.status.as_deref(), Some("active"));
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_not_found() {
        let outcome =
            parse(&response(404, json!({"id": "svc-1", "message": "unknown service"}))).unwrap();
        assert!(matches!(outcome, Outcome::NotFound(ref e) if e.id.as_deref() == Some("svc-1")));
    }

    #[test]
    fn test_parse_unprocessable() {
        let outcome = parse(&response(
            422,
            json!({"name": "threshold", "message": "not a float"}),
        ))
        .unwrap();
        assert!(matches!(outcome, Outcome::UnprocessableEntity(_)));
    }

    #[test]
    fn test_parse_unknown_status_preserves_body() {
        let outcome = parse(&HttpResponse {
            status: 503,
            body: b"overloaded".to_vec(),
        })
        .unwrap();
        match outcome {
            Outcome::Unknown { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, b"overloaded");
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }
}
