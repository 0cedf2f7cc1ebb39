use crate::app::error::ServiceError;
use crate::domain::CateringInquiry;
use crate::infra::mailer::{catering_mail, Mailer};
use std::sync::Arc;
use tracing::{info, warn};

/// Forwards validated catering inquiries to the restaurant's inbox.
pub struct CateringService {
    mailer: Arc<dyn Mailer>,
    inbox: Option<String>,
}

impl CateringService {
    pub fn new(mailer: Arc<dyn Mailer>, inbox: Option<String>) -> Self {
        Self { mailer, inbox }
    }

    pub async fn submit(&self, inquiry: CateringInquiry) -> Result<(), ServiceError> {
        if let Err(fields) = inquiry.validate() {
            return Err(ServiceError::bad_request(format!(
                "Missing or invalid fields: {}",
                fields.join(", ")
            )));
        }

        let inbox = self.inbox.as_deref().ok_or_else(|| {
            warn!("catering inquiry received but no inbox is configured");
            ServiceError::Unavailable("Catering inquiries are temporarily unavailable".to_string())
        })?;

        self.mailer
            .send(catering_mail(inbox, &inquiry))
            .await
            .map_err(|e| ServiceError::failed("Failed to submit inquiry", e))?;
        info!(
            event_type = %inquiry.event_type,
            event_date = %inquiry.event_date,
            guests = inquiry.guest_count().unwrap_or_default(),
            "catering inquiry forwarded"
        );
        Ok(())
    }
}
