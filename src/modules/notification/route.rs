use crate::modules::notification::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/notifications")
            .service(notification_stream)
            .service(list_notifications)
            .service(mark_notifications_read),
    );
}
