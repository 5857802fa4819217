use crate::modules::ranking::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    // Literal paths before the `{id}` matchers.
    cfg.service(
        scope("/rankings")
            .service(create_ranking)
            .service(my_rankings)
            .service(public_rankings)
            .service(friends_rankings)
            .service(change_visibility)
            .service(like_ranking)
            .service(unlike_ranking)
            .service(get_ranking)
            .service(update_ranking)
            .service(delete_ranking),
    );
}
