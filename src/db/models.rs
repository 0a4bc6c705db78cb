/// Data models for the followups table
///
/// `FollowUp` is what the API hands out. `NewFollowUp` and `FollowUpChanges`
/// are already-validated inputs for the write queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::str::FromStr;

/// Lifecycle state of a follow-up
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exact, case-sensitive match. Anything else is rejected.
impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "completed" => Ok(Status::Completed),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Raw row as SQLite returns it. Status is still text here.
#[derive(Debug, Clone, FromRow)]
pub struct FollowUpRow {
    pub id: i64,
    pub person_name: String,
    pub context: String,
    pub followup_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A follow-up reminder
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FollowUp {
    pub id: i64,
    pub person_name: String,
    pub context: String,
    pub followup_date: NaiveDate, // serialized as YYYY-MM-DD
    pub status: Status,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>, // RFC 3339
}

impl TryFrom<FollowUpRow> for FollowUp {
    type Error = sqlx::Error;

    fn try_from(row: FollowUpRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<Status>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })?;

        Ok(FollowUp {
            id: row.id,
            person_name: row.person_name,
            context: row.context,
            followup_date: row.followup_date,
            status,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Validated input for inserting a follow-up. Status is always pending.
#[derive(Debug, Clone)]
pub struct NewFollowUp {
    pub person_name: String,
    pub context: String,
    pub followup_date: NaiveDate,
    pub notes: Option<String>,
}

/// Validated partial update. `None` leaves a column untouched.
///
/// `notes` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct FollowUpChanges {
    pub person_name: Option<String>,
    pub context: Option<String>,
    pub followup_date: Option<NaiveDate>,
    pub status: Option<Status>,
    pub notes: Option<Option<String>>,
}

impl FollowUpChanges {
    pub fn is_empty(&self) -> bool {
        self.person_name.is_none()
            && self.context.is_none()
            && self.followup_date.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FollowUpStats {
    pub due_today: i64,
    pub upcoming: i64,
    pub overdue: i64,
    pub completed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_parse_is_strict() {
        assert_eq!("pending".parse::<Status>(), Ok(Status::Pending));
        assert_eq!("completed".parse::<Status>(), Ok(Status::Completed));
        assert!("Completed".parse::<Status>().is_err());
        assert!("done".parse::<Status>().is_err());
        assert!("".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Pending.to_string(), "pending");
        assert_eq!(Status::default(), Status::Pending);
    }

    #[test]
    fn test_followup_json_shape() {
        let followup = FollowUp {
            id: 7,
            person_name: "Ada".to_string(),
            context: "Conference intro".to_string(),
            followup_date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            status: Status::Completed,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(&followup).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["followup_date"], "2025-01-13");
        assert_eq!(json["status"], "completed");
        assert!(json["notes"].is_null());
        assert_eq!(json["created_at"], "2025-01-02T09:30:00Z");
    }

    #[test]
    fn test_row_with_bad_status_fails_to_convert() {
        let row = FollowUpRow {
            id: 1,
            person_name: "Ada".to_string(),
            context: "ctx".to_string(),
            followup_date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            status: "archived".to_string(),
            notes: None,
            created_at: Utc::now(),
        };
        assert!(FollowUp::try_from(row).is_err());
    }

    #[test]
    fn test_empty_changes() {
        assert!(FollowUpChanges::default().is_empty());
        let changes = FollowUpChanges {
            notes: Some(None),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
