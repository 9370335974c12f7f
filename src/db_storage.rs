use crate::errors::{AppError, ResultExt};
use crate::models::{Company, Document, Message, Notification, NotificationKind, Sender};
use crate::scoring::ProfileSnapshot;
use crate::user_context::UserContext;
use crate::validation::{ValidCompany, ValidCompanyPatch};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Placeholder created when a flow needs a company before the founder described one.
/// Revenue stays zero so the score never reflects a figure nobody reported.
const PLACEHOLDER_NAME: &str = "Default Company";
const PLACEHOLDER_SECTOR: &str = "Technology";
const PLACEHOLDER_TARGET_RAISE: f64 = 1_000_000.0;

/// Metadata for a file already written to disk.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub name: String,
    pub mime_type: String,
    pub size: i64,
    pub path: String,
}

/// Database storage for onboarding records.
///
/// Writes that touch more than one table run inside a single transaction.
pub struct OnboardingStorage {
    pool: PgPool,
}

impl OnboardingStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates or replaces the caller's company and records a notification.
    pub async fn save_company(
        &self,
        user: &UserContext,
        company: &ValidCompany,
    ) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_user(&mut tx, user).await?;

        let saved = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (id, user_id, name, sector, target_raise, revenue)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                sector = EXCLUDED.sector,
                target_raise = EXCLUDED.target_raise,
                revenue = EXCLUDED.revenue,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.user_id)
        .bind(&company.name)
        .bind(&company.sector)
        .bind(company.target_raise)
        .bind(company.revenue)
        .fetch_one(&mut *tx)
        .await
        .context("upserting company")?;

        insert_notification(
            &mut tx,
            &user.user_id,
            NotificationKind::CompanyUpdated,
            "Company information updated successfully.",
        )
        .await?;

        tx.commit().await?;

        tracing::info!("Saved company {} for user {}", saved.id, user.user_id);
        Ok(saved)
    }

    /// Applies a partial update; `None` when the caller has no company.
    pub async fn update_company(
        &self,
        user: &UserContext,
        patch: &ValidCompanyPatch,
    ) -> Result<Option<Company>, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                sector = COALESCE($3, sector),
                target_raise = COALESCE($4, target_raise),
                revenue = COALESCE($5, revenue),
                updated_at = now()
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(&user.user_id)
        .bind(patch.name.as_deref())
        .bind(patch.sector.as_deref())
        .bind(patch.target_raise)
        .bind(patch.revenue)
        .fetch_optional(&mut *tx)
        .await
        .context("updating company")?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        insert_notification(
            &mut tx,
            &user.user_id,
            NotificationKind::CompanyUpdated,
            "Company information updated successfully.",
        )
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn find_company(&self, user_id: &str) -> Result<Option<Company>, AppError> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("loading company")
    }

    /// Marks identity verification complete, creating the placeholder company if needed.
    pub async fn mark_kyc_verified(&self, user: &UserContext) -> Result<Company, AppError> {
        self.set_flag(
            user,
            "UPDATE companies SET kyc_verified = TRUE, updated_at = now() WHERE user_id = $1 RETURNING *",
            NotificationKind::KycVerified,
            "KYC verification completed successfully.",
        )
        .await
    }

    /// Marks the bank-data connection established, creating the placeholder company if needed.
    pub async fn mark_financials_linked(&self, user: &UserContext) -> Result<Company, AppError> {
        self.set_flag(
            user,
            "UPDATE companies SET financials_linked = TRUE, updated_at = now() WHERE user_id = $1 RETURNING *",
            NotificationKind::FinancialsLinked,
            "Financials linked successfully.",
        )
        .await
    }

    async fn set_flag(
        &self,
        user: &UserContext,
        update_sql: &'static str,
        kind: NotificationKind,
        message: &str,
    ) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_user(&mut tx, user).await?;
        ensure_company(&mut tx, &user.user_id).await?;

        let company = sqlx::query_as::<_, Company>(update_sql)
            .bind(&user.user_id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("setting {} flag", kind.as_str()))?;

        insert_notification(&mut tx, &user.user_id, kind, message).await?;

        tx.commit().await?;
        Ok(company)
    }

    /// Returns the caller's company, creating user and placeholder company if missing.
    pub async fn company_for_user(&self, user: &UserContext) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;
        ensure_user(&mut tx, user).await?;
        let company = ensure_company(&mut tx, &user.user_id).await?;
        tx.commit().await?;
        Ok(company)
    }

    /// Inserts the document row and its upload notification.
    pub async fn record_document(
        &self,
        user: &UserContext,
        company_id: Uuid,
        doc: &NewDocument,
    ) -> Result<Document, AppError> {
        let mut tx = self.pool.begin().await?;

        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (id, company_id, name, mime_type, size, path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&doc.name)
        .bind(&doc.mime_type)
        .bind(doc.size)
        .bind(&doc.path)
        .fetch_one(&mut *tx)
        .await
        .context("inserting document")?;

        insert_notification(
            &mut tx,
            &user.user_id,
            NotificationKind::FileUploaded,
            &format!("File {} uploaded successfully.", doc.name),
        )
        .await?;

        tx.commit().await?;
        Ok(document)
    }

    /// Newest first.
    pub async fn list_documents(&self, user_id: &str) -> Result<Vec<Document>, AppError> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT d.* FROM documents d
            JOIN companies c ON c.id = d.company_id
            WHERE c.user_id = $1
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("listing documents")
    }

    /// Every stored document path, for the upload pruner.
    pub async fn all_document_paths(&self) -> Result<Vec<String>, AppError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT path FROM documents")
            .fetch_all(&self.pool)
            .await
            .context("listing document paths")?;
        Ok(rows.into_iter().map(|(path,)| path).collect())
    }

    /// Newest first.
    pub async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("listing notifications")
    }

    /// Sets `read_at` the first time; `None` when the notification is not the caller's.
    pub async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: Uuid,
    ) -> Result<Option<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, now())
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("marking notification read")
    }

    pub async fn post_message(
        &self,
        user: &UserContext,
        sender: Sender,
        content: &str,
    ) -> Result<Message, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_user(&mut tx, user).await?;
        let company = ensure_company(&mut tx, &user.user_id).await?;

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, company_id, sender, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company.id)
        .bind(sender.as_str())
        .bind(content)
        .fetch_one(&mut *tx)
        .await
        .context("inserting message")?;

        tx.commit().await?;
        Ok(message)
    }

    /// Oldest first, as a chat transcript reads.
    pub async fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, AppError> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT m.* FROM messages m
            JOIN companies c ON c.id = m.company_id
            WHERE c.user_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("listing messages")
    }

    /// Builds the scoring input; the default (all-false, zero) snapshot when no company exists.
    pub async fn profile_snapshot(&self, user_id: &str) -> Result<ProfileSnapshot, AppError> {
        let row = sqlx::query_as::<_, (bool, bool, f64, i64)>(
            r#"
            SELECT c.kyc_verified,
                   c.financials_linked,
                   c.revenue,
                   (SELECT COUNT(*) FROM documents d WHERE d.company_id = c.id) AS document_count
            FROM companies c
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("loading profile snapshot")?;

        match row {
            Some((kyc_verified, financials_linked, revenue, document_count)) => {
                ProfileSnapshot::from_counts(kyc_verified, financials_linked, document_count, revenue)
            }
            None => {
                tracing::debug!("No company for user {}, using default snapshot", user_id);
                Ok(ProfileSnapshot::default())
            }
        }
    }
}

async fn ensure_user(conn: &mut PgConnection, user: &UserContext) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE
        SET email = COALESCE(EXCLUDED.email, users.email)
        "#,
    )
    .bind(&user.user_id)
    .bind(user.email.as_deref())
    .execute(&mut *conn)
    .await
    .context("ensuring user")?;
    Ok(())
}

async fn ensure_company(conn: &mut PgConnection, user_id: &str) -> Result<Company, AppError> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO companies (id, user_id, name, sector, target_raise, revenue)
        VALUES ($1, $2, $3, $4, $5, 0)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(PLACEHOLDER_NAME)
    .bind(PLACEHOLDER_SECTOR)
    .bind(PLACEHOLDER_TARGET_RAISE)
    .execute(&mut *conn)
    .await
    .context("creating placeholder company")?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created placeholder company for user {}", user_id);
    }

    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .context("loading company")
}

async fn insert_notification(
    conn: &mut PgConnection,
    user_id: &str,
    kind: NotificationKind,
    message: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO notifications (id, user_id, kind, message) VALUES ($1, $2, $3, $4)")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind.as_str())
        .bind(message)
        .execute(&mut *conn)
        .await
        .context("recording notification")?;
    Ok(())
}
