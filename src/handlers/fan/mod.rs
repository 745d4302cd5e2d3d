pub mod favorites_handler;
pub mod review_handler;

use actix_web::error::ErrorUnauthorized;
use uuid::Uuid;

use crate::middleware::auth::Claims;

/// Account id carried by a validated token.
fn caller_id(claims: &Claims) -> Result<Uuid, actix_web::Error> {
    claims
        .user_id()
        .ok_or_else(|| ErrorUnauthorized("Invalid token subject"))
}
