use crate::error::Result;
use crate::models::interview::Interview;
use reqwest::Client;
use serde_json::json;

/// Pushes bookings to the external calendar-sync endpoint. Strictly
/// best-effort: the interview is already committed when this runs and a
/// sync failure only gets logged.
#[derive(Clone)]
pub struct CalendarService {
    client: Client,
    sync_url: Option<String>,
}

impl CalendarService {
    pub fn new(client: Client, sync_url: Option<String>) -> Self {
        Self { client, sync_url }
    }

    pub async fn sync_booking(&self, interview: &Interview) -> Result<()> {
        self.push("upsert", interview).await
    }

    pub async fn sync_cancellation(&self, interview: &Interview) -> Result<()> {
        self.push("remove", interview).await
    }

    async fn push(&self, action: &str, interview: &Interview) -> Result<()> {
        let Some(url) = &self.sync_url else {
            return Ok(());
        };

        let payload = json!({
            "action": action,
            "interview_id": interview.id,
            "employer_id": interview.employer_id,
            "scheduled_at": interview.scheduled_at,
            "duration_minutes": interview.duration_minutes,
            "location": interview.location,
        });

        let resp = self.client.post(url).json(&payload).send().await?;
        if !resp.status().is_success() {
            tracing::warn!(
                action,
                interview_id = interview.id,
                status = %resp.status(),
                "calendar sync rejected the update"
            );
        }
        Ok(())
    }
}
