use crate::error::Result;
use crate::models::interview::Interview;
use reqwest::Client;
use serde_json::json;

/// Posts booking events to the notification dispatcher (email/SMS lives
/// behind it). Delivery is best-effort: callers spawn this after the
/// booking is already committed, and a failed POST never unwinds it.
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    target_url: Option<String>,
}

impl NotificationService {
    pub fn new(client: Client, target_url: Option<String>) -> Self {
        Self { client, target_url }
    }

    pub async fn notify_booking(&self, event: &str, interview: &Interview) -> Result<()> {
        let Some(url) = &self.target_url else {
            tracing::debug!(event, "notification webhook not configured, skipping");
            return Ok(());
        };

        let payload = json!({
            "event": event,
            "interview_id": interview.id,
            "employer_id": interview.employer_id,
            "candidate_id": interview.candidate_id,
            "scheduled_at": interview.scheduled_at,
            "duration_minutes": interview.duration_minutes,
            "interview_type": interview.interview_type,
            "location": interview.location,
        });

        let resp = self.client.post(url).json(&payload).send().await?;
        if !resp.status().is_success() {
            tracing::warn!(
                event,
                interview_id = interview.id,
                status = %resp.status(),
                "notification webhook rejected the event"
            );
        }
        Ok(())
    }
}
