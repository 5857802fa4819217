use crate::modules::profile::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/profile").service(get_me).service(update_me));
}
