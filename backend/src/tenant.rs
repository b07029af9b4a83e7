//! Caller scope for every request.
//!
//! Session handling lives outside this service; the fronting layer forwards
//! the caller's academy and role as `x-academy-id` / `x-user-role` headers.
//! Handlers receive a [`TenantScope`] and pass it down explicitly.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use common::model::upload::ErrorResponse;
use std::future::{ready, Ready};

pub const ACADEMY_HEADER: &str = "x-academy-id";
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Teacher,
    Parent,
}

impl Role {
    fn parse(value: &str) -> Option<Role> {
        match value {
            "ADMIN" => Some(Role::Admin),
            "TEACHER" => Some(Role::Teacher),
            "PARENT" => Some(Role::Parent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantScope {
    pub academy_id: String,
    pub role: Role,
}

impl TenantScope {
    pub fn new(academy_id: impl Into<String>, role: Role) -> Self {
        TenantScope {
            academy_id: academy_id.into(),
            role,
        }
    }

    /// Only staff may write academy data.
    pub fn require_staff(&self) -> Result<(), TenantError> {
        match self.role {
            Role::Admin | Role::Teacher => Ok(()),
            Role::Parent => Err(TenantError::Forbidden),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("인증이 필요합니다")]
    Unauthenticated,
    #[error("권한이 없습니다")]
    Forbidden,
}

impl ResponseError for TenantError {
    fn status_code(&self) -> StatusCode {
        match self {
            TenantError::Unauthenticated => StatusCode::UNAUTHORIZED,
            TenantError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl FromRequest for TenantScope {
    type Error = TenantError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let scope = header(req, ACADEMY_HEADER).and_then(|academy_id| {
            let role = header(req, ROLE_HEADER).and_then(Role::parse)?;
            Some(TenantScope::new(academy_id, role))
        });
        ready(scope.ok_or(TenantError::Unauthenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn extract(req: TestRequest) -> Result<TenantScope, TenantError> {
        let (req, mut payload) = req.to_http_parts();
        TenantScope::from_request(&req, &mut payload).into_inner()
    }

    #[test]
    fn reads_scope_from_headers() {
        let scope = extract(
            TestRequest::default()
                .insert_header((ACADEMY_HEADER, "academy-1"))
                .insert_header((ROLE_HEADER, "TEACHER")),
        )
        .unwrap();
        assert_eq!(scope, TenantScope::new("academy-1", Role::Teacher));
        assert!(scope.require_staff().is_ok());
    }

    #[test]
    fn missing_or_unknown_headers_are_unauthenticated() {
        assert!(matches!(
            extract(TestRequest::default().insert_header((ROLE_HEADER, "ADMIN"))),
            Err(TenantError::Unauthenticated)
        ));
        assert!(matches!(
            extract(
                TestRequest::default()
                    .insert_header((ACADEMY_HEADER, "academy-1"))
                    .insert_header((ROLE_HEADER, "JANITOR"))
            ),
            Err(TenantError::Unauthenticated)
        ));
    }

    #[test]
    fn parents_are_not_staff() {
        let scope = TenantScope::new("academy-1", Role::Parent);
        assert!(matches!(scope.require_staff(), Err(TenantError::Forbidden)));
    }
}
