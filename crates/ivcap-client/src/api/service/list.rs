//! List registered services.

use reqwest::Method;

use crate::api::ListQuery;
use crate::blocking;
use crate::client::Client;
use crate::error::Result;
use crate::models::{InvalidScopes, NotImplemented, ServiceList};
use crate::request::{HttpResponse, RequestParts};

/// Typed outcome of the list-services endpoint, keyed by response status.
#[derive(Debug)]
pub enum Outcome {
    /// 200: one page of services
    Ok(ServiceList),
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
    query.apply(RequestParts::new(Method::GET, "1/services"))
}

pub fn parse(response: &HttpResponse) -> Result<Outcome> {
    let outcome = match response.status {
        200 => Outcome::Ok(response.json("service list")?),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_query() {
        let query = ListQuery::default()
            .with_filter("name~=fire")
            .with_limit(25)
            .with_page("token-2");
        let parts = request(&query);

        assert_eq!(parts.method, Method::GET);
        assert_eq!(parts.path, "1/services");
        assert_eq!(
            parts.query,
            vec![
                ("filter", "name~=fire".to_string()),
                ("limit", "25".to_string()),
                ("page", "token-2".to_string()),
            ]
        );
        assert!(parts.body.is_none());
    }

    #[test]
    fn test_parse_ok_page() {
        let response = HttpResponse {
            status: 200,
            body: br#"{"services": [{"id": "svc-1", "name": "one"}], "links": {"next": "n"}}"#
                .to_vec(),
        };
        match parse(&response).unwrap() {
            Outcome::Ok(page) => {
                let services = page.services.unwrap();
                assert_eq!(services.len(), 1);
                assert_eq!(services[0].id.as_deref(), Some("svc-1"));
                assert_eq!(page.links.unwrap().next.as_deref(), Some("n"));
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }
}
