// Follow-up service. Checks what clients send, then hands it to the database.
//
// Handlers never talk to `Database` directly, everything goes through here.

use crate::core::payload::{CreateFollowUp, UpdateFollowUp};
use crate::db::{Database, FollowUp, FollowUpChanges, FollowUpStats, NewFollowUp, Status};
use crate::error::{Result, TrackerError};
use chrono::NaiveDate;
use std::sync::Arc;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MISSING_FIELDS: &str = "Missing required fields: person_name, context, followup_date";
const INVALID_DATE: &str = "Invalid date format. Use YYYY-MM-DD";
const INVALID_STATUS: &str = "Invalid status. Must be 'pending' or 'completed'";

#[derive(Clone)]
pub struct Tracker {
    db: Arc<Database>,
}

impl Tracker {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All follow-ups, earliest date first
    pub async fn list(&self) -> Result<Vec<FollowUp>> {
        self.db.list_followups().await
    }

    /// Dashboard counters using the server's local date
    pub async fn stats(&self) -> Result<FollowUpStats> {
        self.stats_on(chrono::Local::now().date_naive()).await
    }

    /// Dashboard counters relative to an explicit `today`
    pub async fn stats_on(&self, today: NaiveDate) -> Result<FollowUpStats> {
        self.db.followup_stats(today).await
    }

    pub async fn create(&self, payload: CreateFollowUp) -> Result<FollowUp> {
        let input = validate_create(payload)?;
        let followup = self.db.insert_followup(input).await?;

        tracing::debug!(id = followup.id, date = %followup.followup_date, "follow-up created");
        Ok(followup)
    }

    /// Apply the fields present in `payload` to follow-up `id`
    ///
    /// The payload is validated before the row is looked up, so a bad date
    /// for an unknown id reports the bad date.
    pub async fn update(&self, id: i64, payload: UpdateFollowUp) -> Result<FollowUp> {
        let changes = validate_update(payload)?;

        let followup = self
            .db
            .update_followup(id, changes)
            .await?
            .ok_or_else(TrackerError::followup_not_found)?;

        tracing::debug!(id, status = %followup.status, "follow-up updated");
        Ok(followup)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.db.delete_followup(id).await? {
            return Err(TrackerError::followup_not_found());
        }

        tracing::debug!(id, "follow-up deleted");
        Ok(())
    }
}

fn validate_create(payload: CreateFollowUp) -> Result<NewFollowUp> {
    let (person_name, context, followup_date) =
        match (payload.person_name, payload.context, payload.followup_date) {
            (Some(person_name), Some(context), Some(followup_date)) => {
                (person_name, context, followup_date)
            }
            _ => return Err(TrackerError::Validation(MISSING_FIELDS.to_string())),
        };

    Ok(NewFollowUp {
        person_name,
        context,
        followup_date: parse_date(&followup_date)?,
        notes: payload.notes,
    })
}

fn validate_update(payload: UpdateFollowUp) -> Result<FollowUpChanges> {
    let followup_date = match required("followup_date", payload.followup_date)? {
        Some(raw) => Some(parse_date(&raw)?),
        None => None,
    };

    let status = match required("status", payload.status)? {
        Some(raw) => Some(parse_status(&raw)?),
        None => None,
    };

    Ok(FollowUpChanges {
        person_name: required("person_name", payload.person_name)?,
        context: required("context", payload.context)?,
        followup_date,
        status,
        notes: payload.notes,
    })
}

// A present key on a required column may not be null
fn required(field: &str, value: Option<Option<String>>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(Some(v)) => Ok(Some(v)),
        Some(None) => Err(TrackerError::Validation(format!("{} cannot be null", field))),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| TrackerError::Validation(INVALID_DATE.to_string()))
}

pub fn parse_status(raw: &str) -> Result<Status> {
    raw.parse::<Status>()
        .map_err(|_| TrackerError::Validation(INVALID_STATUS.to_string()))
}
