use actix_web::{web, HttpResponse};

use super::caller_id;
use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::fan::{CreateReviewRequest, ReviewQuery};
use crate::services::FanService;

pub async fn get_reviews(
    query: web::Query<ReviewQuery>,
    fan_service: web::Data<FanService>,
) -> Result<HttpResponse, LeagueError> {
    let reviews = fan_service.list_reviews(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Reviews retrieved", reviews)))
}

#[tracing::instrument(name = "Post review", skip(request, fan_service, claims), fields(username = %claims.username))]
pub async fn create_review(
    request: web::Json<CreateReviewRequest>,
    fan_service: web::Data<FanService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = caller_id(&claims)?;
    let review = fan_service
        .create_review(user_id, &claims.username, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Review posted", review)))
}
