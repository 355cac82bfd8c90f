//! Fetch a single service by ID.

use reqwest::Method;

use crate::blocking;
use crate::client::Client;
use crate::error::Result;
use crate::models::{InvalidScopes, NotImplemented, ResourceNotFound, ServiceStatus};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the read-service endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: the requested service
    Ok(ServiceStatus),
    /// 400: malformed request
    BadRequest,
    /// 401: missing or invalid credentials
    Unauthorized,
    /// 403: insufficient scopes
    Forbidden(InvalidScopes),
    /// 404: no service with the given ID
    NotFound(ResourceNotFound),
    /// 501: not supported by this deployment
    NotImplemented(NotImplemented),
    /// A status outside the endpoint's contract
    Unknown { status: u16, body: Vec<u8> },
}

pub fn request(id: &str) -> RequestParts {
    RequestParts::new(Method::GET, format!("1/services/{id}"))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("service status")?),
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
        let parts = request("svc-1");
        assert_eq!(parts.method, Method::GET);
        assert_eq!(parts.path, "1/services/svc-1");
        assert!(parts.query.is_empty());
        assert!(parts.body.is_none());
    }

    #[test]
    fn test_parse_forbidden() {
        let outcome =
            parse(&response(403, json!({"id": "svc-1", "message": "missing scope"}))).unwrap();
        assert!(matches!(outcome, Outcome::Forbidden(ref e) if e.id.as_deref() == Some("svc-1")));
    }

    #[test]
    fn test_parse_not_implemented() {
        let outcome = parse(&response(501, json!({"message": "read unsupported"}))).unwrap();
        match outcome {
            Outcome::NotImplemented(e) => {
                assert_eq!(e.message.as_deref(), Some("read unsupported"));
            }
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }
}
