//! Catering inquiry form.

use crate::domain::validation::looks_like_email;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CateringInquiry {
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub phone: String,
    pub event_type: String,
    pub question_type: String,
    pub coordinator_info: String,
    pub event_date: String,
    pub event_time: String,
    pub event_duration: String,
    pub event_address: String,
    pub number_of_guests: String,
    pub referral: String,
    pub comments: String,
}

impl CateringInquiry {
    /// Returns the wire names of every missing or invalid field.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("eventType", &self.event_type),
            ("eventDate", &self.event_date),
            ("eventTime", &self.event_time),
            ("eventDuration", &self.event_duration),
            ("eventAddress", &self.event_address),
            ("numberOfGuests", &self.number_of_guests),
            ("referral", &self.referral),
        ];

        let mut problems: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
            problems.push("email");
        }
        if !self.number_of_guests.trim().is_empty() && self.guest_count().is_none() {
            problems.push("numberOfGuests");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    pub fn guest_count(&self) -> Option<u32> {
        self.number_of_guests
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
    }

    /// Label/value pairs in form order, for rendering.
    pub fn fields(&self) -> [(&'static str, &str); 14] {
        [
            ("Name", &self.name),
            ("Company", &self.company_name),
            ("Email", &self.email),
            ("Phone", &self.phone),
            ("Event type", &self.event_type),
            ("Question type", &self.question_type),
            ("Coordinator", &self.coordinator_info),
            ("Event date", &self.event_date),
            ("Event time", &self.event_time),
            ("Duration", &self.event_duration),
            ("Address", &self.event_address),
            ("Guests", &self.number_of_guests),
            ("Referral", &self.referral),
            ("Comments", &self.comments),
        ]
    }
}
