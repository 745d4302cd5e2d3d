use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::services::FanService;

// DELETE /admin/reviews/{id}
#[tracing::instrument(name = "Admin delete review", skip(fan_service, claims), fields(admin = %claims.username))]
pub async fn delete_review(
    review_id: web::Path<Uuid>,
    fan_service: web::Data<FanService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    fan_service.delete_review(review_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Review deleted")))
}
