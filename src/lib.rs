pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod scheduling;
pub mod services;

use crate::services::{
    calendar_service::CalendarService, interview_service::InterviewService,
    notification_service::NotificationService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub interview_service: InterviewService,
    pub notification_service: NotificationService,
    pub calendar_service: CalendarService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();

        let interview_service = InterviewService::new(pool.clone());
        let notification_service = NotificationService::new(
            http_client.clone(),
            config.notification_webhook_url.clone(),
        );
        let calendar_service =
            CalendarService::new(http_client, config.calendar_sync_url.clone());

        Self {
            pool,
            interview_service,
            notification_service,
            calendar_service,
        }
    }
}
