//! Caller identity middleware for Axum
//!
//! The identity provider in front of the service authenticates the user
//! and forwards who they are in two headers. This middleware turns them
//! into an explicit [`Caller`] stored in request extensions; handlers take
//! it from there and pass it into every booking operation.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::identity::{Caller, CallerRole};
use crate::interfaces::http::common::ApiResponse;

pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header_value<'a>(request: &'a Request<Body>, name: &str) -> Option<&'a str> {
    request
        .headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolve the caller from identity headers. No headers means anonymous.
pub fn caller_from_request(request: &Request<Body>) -> Result<Caller, String> {
    let email = header_value(request, USER_EMAIL_HEADER).map(String::from);
    let role = header_value(request, USER_ROLE_HEADER)
        .map(|r| r.parse::<CallerRole>())
        .transpose()
        .map_err(|e| e.to_string())?;

    match (role, email) {
        (Some(CallerRole::Customer), Some(email)) => Ok(Caller::customer(email)),
        (Some(CallerRole::Customer), None) => {
            Err(format!("{} is required for customers", USER_EMAIL_HEADER))
        }
        (Some(CallerRole::Owner), email) => Ok(Caller::owner(email)),
        // an email alone identifies a customer
        (None, Some(email)) => Ok(Caller::customer(email)),
        (None, None) => Ok(Caller::anonymous()),
    }
}

pub async fn identity_middleware(mut request: Request<Body>, next: Next) -> Response {
    match caller_from_request(&request) {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(message) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(message))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn no_headers_is_anonymous() {
        assert_eq!(caller_from_request(&request(&[])).unwrap(), Caller::anonymous());
    }

    #[test]
    fn role_and_email_build_caller() {
        let caller = caller_from_request(&request(&[
            (USER_ROLE_HEADER, "customer"),
            (USER_EMAIL_HEADER, "ana@example.com"),
        ]))
        .unwrap();
        assert_eq!(caller, Caller::customer("ana@example.com"));

        let owner = caller_from_request(&request(&[(USER_ROLE_HEADER, "OWNER")])).unwrap();
        assert_eq!(owner, Caller::owner(None));
    }

    #[test]
    fn email_without_role_is_customer() {
        let caller =
            caller_from_request(&request(&[(USER_EMAIL_HEADER, "bo@example.com")])).unwrap();
        assert_eq!(caller.customer_email(), Some("bo@example.com"));
    }

    #[test]
    fn bad_headers_are_rejected() {
        assert!(caller_from_request(&request(&[(USER_ROLE_HEADER, "chef")])).is_err());
        assert!(caller_from_request(&request(&[(USER_ROLE_HEADER, "customer")])).is_err());
    }
}
