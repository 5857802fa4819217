use actix_web::{get, patch, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::profile::{model::{ProfileResponse, UpdateProfileModel}, service::ProfileService},
    utils::ValidatedJson,
};

#[get("/me")]
pub async fn get_me(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let profile = profile_service.me(&user_id).await?;

    Ok(success::Success::ok(Some(profile)))
}

#[patch("/me")]
pub async fn update_me(
    profile_service: web::Data<ProfileService>,
    body: ValidatedJson<UpdateProfileModel>,
    req: HttpRequest,
) -> Result<success::Success<ProfileResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let profile = profile_service.update_profile(&user_id, body.0).await?;

    Ok(success::Success::ok(Some(profile)).message("Profile updated successfully"))
}
