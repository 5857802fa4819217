use actix_web::{delete, get, patch, post, put, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::catalog::repository_pg::CatalogRepositoryPg,
    modules::friend::repository_pg::FriendRepositoryPg,
    modules::notification::repository_pg::NotificationRepositoryPg,
    modules::profile::repository_pg::ProfileRepositoryPg,
    modules::ranking::{
        model::{ChangeVisibilityBody, CreatedRanking, FullRankingResponse, SaveRankingBody},
        repository_pg::RankingRepositoryPg,
        schema::{RankingEntity, RankingSummary},
        service::RankingService,
    },
    utils::ValidatedJson,
};

pub type RankingSvc = RankingService<
    RankingRepositoryPg,
    CatalogRepositoryPg,
    ProfileRepositoryPg,
    FriendRepositoryPg,
    NotificationRepositoryPg,
>;

#[post("")]
pub async fn create_ranking(
    ranking_service: web::Data<RankingSvc>,
    body: ValidatedJson<SaveRankingBody>,
    req: HttpRequest,
) -> Result<success::Success<CreatedRanking>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let created = ranking_service.create(&user_id, body.0).await?;

    Ok(success::Success::created(Some(created)).message("Ranking saved"))
}

#[get("/mine")]
pub async fn my_rankings(
    ranking_service: web::Data<RankingSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RankingSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let rankings = ranking_service.list_mine(&user_id).await?;

    Ok(success::Success::ok(Some(rankings)))
}

#[get("/public")]
pub async fn public_rankings(
    ranking_service: web::Data<RankingSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RankingSummary>>, error::Error> {
    get_claims(&req)?;
    let rankings = ranking_service.list_public().await?;

    Ok(success::Success::ok(Some(rankings)))
}

#[get("/friends")]
pub async fn friends_rankings(
    ranking_service: web::Data<RankingSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RankingSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let rankings = ranking_service.list_friends(&user_id).await?;

    Ok(success::Success::ok(Some(rankings)))
}

#[get("/{id}")]
pub async fn get_ranking(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FullRankingResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let full = ranking_service
        .get_full(&user_id, &path)
        .await?
        .ok_or_else(|| error::Error::not_found("Ranking not found"))?;

    Ok(success::Success::ok(Some(full)))
}

#[put("/{id}")]
pub async fn update_ranking(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    body: ValidatedJson<SaveRankingBody>,
    req: HttpRequest,
) -> Result<success::Success<RankingEntity>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let updated = ranking_service.update(&user_id, &path, body.0).await?;

    Ok(success::Success::ok(Some(updated)).message("Ranking updated"))
}

#[delete("/{id}")]
pub async fn delete_ranking(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    ranking_service.delete(&user_id, &path).await?;

    Ok(success::Success::no_content())
}

#[patch("/{id}/visibility")]
pub async fn change_visibility(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    body: ValidatedJson<ChangeVisibilityBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    ranking_service.change_visibility(&user_id, &path, body.0.visibility).await?;

    Ok(success::Success::ok(None).message("Visibility updated"))
}

#[post("/{id}/like")]
pub async fn like_ranking(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    ranking_service.like(&user_id, &path).await?;

    Ok(success::Success::ok(None).message("Ranking liked"))
}

#[delete("/{id}/like")]
pub async fn unlike_ranking(
    ranking_service: web::Data<RankingSvc>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    ranking_service.unlike(&user_id, &path).await?;

    Ok(success::Success::no_content())
}
