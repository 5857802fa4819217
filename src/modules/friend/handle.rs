use actix_web::{get, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::friend::{
        model::{FriendsRankingsQuery, PendingRequestView, RespondBody, SendRequestBody, SentRequest},
        repository_pg::FriendRepositoryPg,
        service::FriendService,
    },
    modules::notification::repository_pg::NotificationRepositoryPg,
    modules::profile::{model::ProfileResponse, repository_pg::ProfileRepositoryPg},
    modules::ranking::{repository_pg::RankingRepositoryPg, schema::RankingSummary},
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendSvc = FriendService<
    FriendRepositoryPg,
    ProfileRepositoryPg,
    RankingRepositoryPg,
    NotificationRepositoryPg,
>;

#[post("/send-request")]
pub async fn send_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<SendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<SentRequest>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let (request, message) =
        friend_service.send_request(&user_id, &body.0.friend_code).await?;

    Ok(success::Success::ok(Some(SentRequest { request_id: request.id })).message(message))
}

#[post("/respond")]
pub async fn respond(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<RespondBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let message = friend_service
        .respond_to_request(&user_id, &body.0.request_id, body.0.action)
        .await?;

    Ok(success::Success::ok(None).message(message))
}

#[get("")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<ProfileResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.list_friends(&user_id).await?;

    Ok(success::Success::ok(Some(friends)))
}

#[get("/requests")]
pub async fn list_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PendingRequestView>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.list_requests(&user_id).await?;

    Ok(success::Success::ok(Some(requests)))
}

#[get("/rankings")]
pub async fn friends_rankings(
    friend_service: web::Data<FriendSvc>,
    query: ValidatedQuery<FriendsRankingsQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<RankingSummary>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let rankings = friend_service
        .friends_rankings(&user_id, query.0.source_type, &query.0.source_id)
        .await?;

    Ok(success::Success::ok(Some(rankings)))
}
