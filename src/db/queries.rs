/// SQL query functions for the followups table
///
/// Each function runs exactly one statement against the pool.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use chrono::{NaiveDate, Utc};

const FOLLOWUP_COLUMNS: &str =
    "id, person_name, context, followup_date, status, notes, created_at";

impl Database {
    /// Get every follow-up, earliest date first
    ///
    /// Rows sharing a date come back in id order.
    pub async fn list_followups(&self) -> Result<Vec<FollowUp>> {
        let rows = sqlx::query_as::<_, FollowUpRow>(&format!(
            "SELECT {} FROM followups ORDER BY followup_date ASC, id ASC",
            FOLLOWUP_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        let followups = rows
            .into_iter()
            .map(FollowUp::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(followups)
    }

    /// Get follow-up by ID
    pub async fn get_followup(&self, id: i64) -> Result<Option<FollowUp>> {
        let row = sqlx::query_as::<_, FollowUpRow>(&format!(
            "SELECT {} FROM followups WHERE id = ?",
            FOLLOWUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(FollowUp::try_from).transpose()?)
    }

    /// Insert a new follow-up
    ///
    /// Status is forced to pending, `id` and `created_at` are assigned here.
    ///
    /// # Returns
    /// * `Ok(FollowUp)` - The stored record
    pub async fn insert_followup(&self, input: NewFollowUp) -> Result<FollowUp> {
        let row = sqlx::query_as::<_, FollowUpRow>(&format!(
            r#"
            INSERT INTO followups (person_name, context, followup_date, status, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            FOLLOWUP_COLUMNS
        ))
        .bind(input.person_name)
        .bind(input.context)
        .bind(input.followup_date)
        .bind(Status::Pending.as_str())
        .bind(input.notes)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(FollowUp::try_from(row)?)
    }

    /// Apply a partial update
    ///
    /// Columns whose change is `None` keep their value. The whole update is a
    /// single statement, so a concurrent writer either sees all of it or none.
    ///
    /// # Returns
    /// * `Ok(Some(FollowUp))` - The record after the update
    /// * `Ok(None)` - No follow-up with this id
    pub async fn update_followup(
        &self,
        id: i64,
        changes: FollowUpChanges,
    ) -> Result<Option<FollowUp>> {
        if changes.is_empty() {
            return self.get_followup(id).await;
        }

        let (notes_set, notes) = match changes.notes {
            Some(notes) => (true, notes),
            None => (false, None),
        };

        let row = sqlx::query_as::<_, FollowUpRow>(&format!(
            r#"
            UPDATE followups SET
                person_name = COALESCE(?, person_name),
                context = COALESCE(?, context),
                followup_date = COALESCE(?, followup_date),
                status = COALESCE(?, status),
                notes = CASE WHEN ? THEN ? ELSE notes END
            WHERE id = ?
            RETURNING {}
            "#,
            FOLLOWUP_COLUMNS
        ))
        .bind(changes.person_name)
        .bind(changes.context)
        .bind(changes.followup_date)
        .bind(changes.status.map(|s| s.as_str()))
        .bind(notes_set)
        .bind(notes)
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(FollowUp::try_from).transpose()?)
    }

    /// Delete a follow-up
    ///
    /// # Returns
    /// * `Ok(true)` - A row was deleted
    /// * `Ok(false)` - No follow-up with this id
    pub async fn delete_followup(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM followups WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count follow-ups per dashboard bucket relative to `today`
    ///
    /// The three date buckets only look at pending rows. `completed` counts
    /// every completed row regardless of its date.
    pub async fn followup_stats(&self, today: NaiveDate) -> Result<FollowUpStats> {
        let (due_today, upcoming, overdue, completed): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'pending' AND followup_date = ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'pending' AND followup_date > ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'pending' AND followup_date < ? THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0)
            FROM followups
            "#,
        )
        .bind(today)
        .bind(today)
        .bind(today)
        .fetch_one(self.pool())
        .await?;

        Ok(FollowUpStats {
            due_today,
            upcoming,
            overdue,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_followup(person: &str, on: NaiveDate) -> NewFollowUp {
        NewFollowUp {
            person_name: person.to_string(),
            context: "Coffee chat".to_string(),
            followup_date: on,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_followup() {
        let db = Database::new_test().await.unwrap();

        let mut input = new_followup("Ada", date(2025, 3, 1));
        input.notes = Some("Send the deck".to_string());
        let created = db.insert_followup(input).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, Status::Pending);
        assert_eq!(created.notes.as_deref(), Some("Send the deck"));

        let fetched = db.get_followup(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_id() {
        let db = Database::new_test().await.unwrap();

        let late = db.insert_followup(new_followup("Late", date(2025, 6, 1))).await.unwrap();
        let early = db.insert_followup(new_followup("Early", date(2025, 1, 1))).await.unwrap();
        let tie = db.insert_followup(new_followup("Tie", date(2025, 1, 1))).await.unwrap();

        let ids: Vec<i64> = db
            .list_followups()
            .await
            .unwrap()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![early.id, tie.id, late.id]);
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let db = Database::new_test().await.unwrap();

        let mut input = new_followup("Ada", date(2025, 3, 1));
        input.notes = Some("keep me".to_string());
        let created = db.insert_followup(input).await.unwrap();

        let changes = FollowUpChanges {
            status: Some(Status::Completed),
            ..Default::default()
        };
        let updated = db.update_followup(created.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.status, Status::Completed);
        assert_eq!(updated.person_name, "Ada");
        assert_eq!(updated.followup_date, date(2025, 3, 1));
        assert_eq!(updated.notes.as_deref(), Some("keep me"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_notes() {
        let db = Database::new_test().await.unwrap();

        let mut input = new_followup("Ada", date(2025, 3, 1));
        input.notes = Some("old".to_string());
        let created = db.insert_followup(input).await.unwrap();

        let changes = FollowUpChanges {
            notes: Some(None),
            followup_date: Some(date(2025, 4, 2)),
            ..Default::default()
        };
        let updated = db.update_followup(created.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.notes, None);
        assert_eq!(updated.followup_date, date(2025, 4, 2));
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let db = Database::new_test().await.unwrap();

        let changes = FollowUpChanges {
            context: Some("anything".to_string()),
            ..Default::default()
        };
        assert!(db.update_followup(42, changes).await.unwrap().is_none());
        assert!(db
            .update_followup(42, FollowUpChanges::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_followup() {
        let db = Database::new_test().await.unwrap();

        let created = db.insert_followup(new_followup("Ada", date(2025, 3, 1))).await.unwrap();

        assert!(db.delete_followup(created.id).await.unwrap());
        assert!(!db.delete_followup(created.id).await.unwrap());
        assert!(db.get_followup(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_buckets() {
        let db = Database::new_test().await.unwrap();
        let today = date(2025, 5, 10);

        db.insert_followup(new_followup("Today", today)).await.unwrap();
        db.insert_followup(new_followup("Tomorrow", date(2025, 5, 11))).await.unwrap();
        db.insert_followup(new_followup("Next year", date(2026, 1, 1))).await.unwrap();
        db.insert_followup(new_followup("Yesterday", date(2025, 5, 9))).await.unwrap();
        let done = db.insert_followup(new_followup("Done", date(2024, 1, 1))).await.unwrap();
        db.update_followup(
            done.id,
            FollowUpChanges {
                status: Some(Status::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stats = db.followup_stats(today).await.unwrap();
        assert_eq!(
            stats,
            FollowUpStats {
                due_today: 1,
                upcoming: 2,
                overdue: 1,
                completed: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_on_empty_table() {
        let db = Database::new_test().await.unwrap();
        let stats = db.followup_stats(date(2025, 5, 10)).await.unwrap();
        assert_eq!(stats, FollowUpStats::default());
    }
}
