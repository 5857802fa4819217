use crate::modules::friend::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(send_request)
            .service(respond)
            .service(list_requests)
            .service(friends_rankings)
            .service(list_friends),
    );
}
