//! Counterparty (customer / supplier) service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::{clean_text, nullable, DeletionSummary};
use crate::admin::search_pattern;
use crate::error::{AppError, AppResult};
use crate::validation as rules;
use shared::{Actor, AuditFields, AuditStamp, Counterparty, PaginatedResponse, Pagination};

/// Counterparty service
#[derive(Clone)]
pub struct CounterpartyService {
    db: PgPool,
}

/// Input for creating a counterparty
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCounterpartyInput {
    #[validate(custom = "rules::name")]
    pub full_name: String,
    #[validate(custom = "rules::phone")]
    pub phone: Option<String>,
    #[validate(custom = "rules::company_name")]
    pub company_name: Option<String>,
}

/// Input for updating a counterparty. `null` clears an optional field.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCounterpartyInput {
    #[validate(custom = "rules::name")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom = "rules::phone")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(custom = "rules::company_name")]
    pub company_name: Option<Option<String>>,
}

impl CounterpartyService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List counterparties, searching name, phone and company
    pub async fn list(
        &self,
        q: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<Counterparty>> {
        let search = search_pattern(q);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM counterparties
            WHERE ($1::text IS NULL
                   OR full_name ILIKE $1 OR phone ILIKE $1 OR company_name ILIKE $1)
            "#,
        )
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let counterparties = sqlx::query_as::<_, Counterparty>(
            r#"
            SELECT id, full_name, phone, company_name,
                   created_at, updated_at, created_by, updated_by
            FROM counterparties
            WHERE ($1::text IS NULL
                   OR full_name ILIKE $1 OR phone ILIKE $1 OR company_name ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse::new(counterparties, pagination, total.max(0) as u64))
    }

    /// Get a counterparty by ID
    pub async fn get(&self, counterparty_id: Uuid) -> AppResult<Counterparty> {
        sqlx::query_as::<_, Counterparty>(
            r#"
            SELECT id, full_name, phone, company_name,
                   created_at, updated_at, created_by, updated_by
            FROM counterparties
            WHERE id = $1
            "#,
        )
        .bind(counterparty_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Counterparty".to_string()))
    }

    /// Create a counterparty
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateCounterpartyInput,
    ) -> AppResult<Counterparty> {
        input.validate()?;

        let audit = AuditFields::created(AuditStamp::now(actor));

        let counterparty = sqlx::query_as::<_, Counterparty>(
            r#"
            INSERT INTO counterparties (full_name, phone, company_name,
                                        created_at, updated_at, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, full_name, phone, company_name,
                      created_at, updated_at, created_by, updated_by
            "#,
        )
        .bind(input.full_name.trim())
        .bind(clean_text(input.phone))
        .bind(clean_text(input.company_name))
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .bind(audit.created_by)
        .bind(audit.updated_by)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(counterparty_id = %counterparty.id, %actor, "counterparty created");
        Ok(counterparty)
    }

    /// Update a counterparty
    pub async fn update(
        &self,
        actor: Actor,
        counterparty_id: Uuid,
        input: UpdateCounterpartyInput,
    ) -> AppResult<Counterparty> {
        input.validate()?;

        let mut counterparty = self.get(counterparty_id).await?;

        if let Some(full_name) = input.full_name {
            counterparty.full_name = full_name.trim().to_string();
        }
        if let Some(phone) = input.phone {
            counterparty.phone = clean_text(phone);
        }
        if let Some(company_name) = input.company_name {
            counterparty.company_name = clean_text(company_name);
        }
        counterparty.audit.touch(AuditStamp::now(actor));

        let counterparty = sqlx::query_as::<_, Counterparty>(
            r#"
            UPDATE counterparties
            SET full_name = $1, phone = $2, company_name = $3,
                updated_at = $4, updated_by = $5
            WHERE id = $6
            RETURNING id, full_name, phone, company_name,
                      created_at, updated_at, created_by, updated_by
            "#,
        )
        .bind(&counterparty.full_name)
        .bind(&counterparty.phone)
        .bind(&counterparty.company_name)
        .bind(counterparty.audit.updated_at)
        .bind(counterparty.audit.updated_by)
        .bind(counterparty_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Counterparty".to_string()))?;

        tracing::info!(%counterparty_id, %actor, "counterparty updated");
        Ok(counterparty)
    }

    /// Delete a counterparty with its operation groups and their operations
    pub async fn delete(&self, actor: Actor, counterparty_id: Uuid) -> AppResult<DeletionSummary> {
        let mut tx = self.db.begin().await?;

        let (groups, operations) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM operation_groups WHERE counterparty_id = $1),
                (SELECT COUNT(*) FROM operations o
                   JOIN operation_groups g ON g.id = o.group_id
                  WHERE g.counterparty_id = $1)
            "#,
        )
        .bind(counterparty_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM counterparties WHERE id = $1")
            .bind(counterparty_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Counterparty".to_string()));
        }

        tx.commit().await?;

        tracing::info!(%counterparty_id, groups, operations, %actor, "counterparty deleted");
        Ok(DeletionSummary::new("counterparty", counterparty_id)
            .cascaded("operation_group", groups)
            .cascaded("operation", operations))
    }
}
