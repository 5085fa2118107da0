//! Caller identity, as forwarded by the authenticating gateway in front of the service.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::application::order_service::Actor;
use crate::domain::user::Role;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Actor);

impl AuthenticatedUser {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Result<Option<&'a str>, AppError> {
    req.headers()
        .get(name)
        .map(|v| {
            v.to_str()
                .map(str::trim)
                .map_err(|_| AppError::Unauthorized(format!("Malformed {name} header")))
        })
        .transpose()
}

fn identify(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let user_id = header(req, USER_ID_HEADER)?
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::Unauthorized(format!("Malformed {USER_ID_HEADER} header")))?;

    let role = match header(req, USER_ROLE_HEADER)?.filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .to_ascii_lowercase()
            .parse::<Role>()
            .map_err(|_| AppError::Unauthorized(format!("Unknown role '{raw}'")))?,
        None => Role::Client,
    };

    Ok(AuthenticatedUser(Actor { user_id, role }))
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(identify(req))
    }
}
