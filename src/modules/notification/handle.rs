use actix_web::{get, patch, web, HttpRequest, HttpResponse};
use actix_ws::Message;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::notification::{
        hub::NotificationHub,
        model::{ListNotificationsQuery, MarkReadBody, DEFAULT_LIST_LIMIT},
        repository_pg::NotificationRepositoryPg,
        schema::NotificationEntity,
        service::NotificationService,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type NotificationSvc = NotificationService<NotificationRepositoryPg>;

#[get("")]
pub async fn list_notifications(
    notification_service: web::Data<NotificationSvc>,
    query: ValidatedQuery<ListNotificationsQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<NotificationEntity>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let limit = query.0.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let unread_only = query.0.unread_only.unwrap_or(false);

    let notifications = notification_service.list(&user_id, limit, unread_only).await?;

    Ok(success::Success::ok(Some(notifications)))
}

#[patch("")]
pub async fn mark_notifications_read(
    notification_service: web::Data<NotificationSvc>,
    body: ValidatedJson<MarkReadBody>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;

    if body.0.mark_all_read.unwrap_or(false) {
        notification_service.mark_all_read(&user_id).await?;
    } else if let Some(ids) = &body.0.notification_ids {
        notification_service.mark_read(&user_id, ids).await?;
    } else {
        return Err(error::Error::bad_request(
            "Either notificationIds or markAllRead is required",
        ));
    }

    Ok(success::Success::ok(None).message("Notifications marked as read"))
}

/// Upgrade to a WebSocket pushing this user's new notifications as they are
/// inserted. One subscription per connection; disconnect or close tears the
/// channel down so nothing leaks.
#[get("/stream")]
pub async fn notification_stream(
    hub: web::Data<NotificationHub>,
    req: HttpRequest,
    stream: web::Payload,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = get_claims(&req)?.sub;

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    let (session_id, mut rx) = hub.subscribe(&user_id);
    let hub = hub.into_inner();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Ping(data))) => {
                            if ws_session.pong(&data).await.is_err() {
                                break;
                            }
                        }

                        Some(Ok(Message::Close(reason))) => {
                            tracing::debug!("Notification stream close frame: {:?}", reason);
                            break;
                        }

                        // Clients only listen on this channel.
                        Some(Ok(_)) => {}

                        Some(Err(e)) => {
                            tracing::warn!("Notification stream protocol error: {}", e);
                            break;
                        }

                        // Client went away.
                        None => break,
                    }
                }

                notification = rx.recv() => {
                    let Some(notification) = notification else { break };
                    match serde_json::to_string(&notification) {
                        Ok(json) => {
                            if ws_session.text(json).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Could not serialize notification: {}", e);
                        }
                    }
                }
            }
        }

        hub.unsubscribe(&user_id, session_id);
        let _ = ws_session.close(None).await;
    });

    Ok(response)
}
