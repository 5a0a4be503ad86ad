//! Operation group service: batches of operations under one counterparty

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use super::operation::{ensure_exists, group_lines, insert_operation, GroupLineInput, OperationLine};
use super::{clean_text, nullable, DeletionSummary};
use crate::admin::search_pattern;
use crate::error::{AppError, AppResult};
use shared::{
    group_totals, Action, Actor, AuditFields, AuditStamp, GroupTotals, LineItem, OperationGroup,
    PaginatedResponse, Pagination,
};

/// Operation group service
#[derive(Clone)]
pub struct OperationGroupService {
    db: PgPool,
}

/// List filters for operation groups
#[derive(Debug, Default, Deserialize)]
pub struct OperationGroupFilter {
    pub q: Option<String>,
    pub action: Option<Action>,
    pub counterparty_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct GroupRow {
    #[sqlx(flatten)]
    group: OperationGroup,
    counterparty_name: String,
    total_quantity: i64,
    total_amount: Decimal,
}

/// Operation group row of the admin list view
#[derive(Debug, Clone, Serialize)]
pub struct OperationGroupListItem {
    #[serde(flatten)]
    pub group: OperationGroup,
    pub counterparty_name: String,
    #[serde(flatten)]
    pub totals: GroupTotals,
}

impl From<GroupRow> for OperationGroupListItem {
    fn from(row: GroupRow) -> Self {
        Self {
            group: row.group,
            counterparty_name: row.counterparty_name,
            totals: GroupTotals {
                total_quantity: row.total_quantity,
                total_amount: row.total_amount.round_dp(2),
            },
        }
    }
}

/// Operation group with its operations and totals
#[derive(Debug, Clone, Serialize)]
pub struct OperationGroupDetail {
    #[serde(flatten)]
    pub group: OperationGroup,
    pub counterparty_name: String,
    pub operations: Vec<OperationLine>,
    #[serde(flatten)]
    pub totals: GroupTotals,
}

/// Input for creating an operation group, optionally with its lines
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateOperationGroupInput {
    pub counterparty_id: Uuid,
    pub action: Action,
    pub comment: Option<String>,
    #[serde(default)]
    pub operations: Vec<GroupLineInput>,
}

/// Input for updating an operation group
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateOperationGroupInput {
    pub counterparty_id: Option<Uuid>,
    pub action: Option<Action>,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: Option<Option<String>>,
}

impl OperationGroupService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List groups with counterparty name and totals
    pub async fn list(
        &self,
        filter: &OperationGroupFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<OperationGroupListItem>> {
        let search = search_pattern(filter.q.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM operation_groups g
            JOIN counterparties c ON c.id = g.counterparty_id
            WHERE ($1::text IS NULL OR g.comment ILIKE $1 OR c.full_name ILIKE $1)
              AND ($2::smallint IS NULL OR g.action = $2)
              AND ($3::uuid IS NULL OR g.counterparty_id = $3)
            "#,
        )
        .bind(&search)
        .bind(filter.action)
        .bind(filter.counterparty_id)
        .fetch_one(&self.db)
        .await?;

        // Amounts are summed unrounded; rounding happens once per group
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT g.id, g.counterparty_id, g.action, g.comment,
                   g.created_at, g.updated_at, g.created_by, g.updated_by,
                   c.full_name AS counterparty_name,
                   COALESCE(SUM(o.quantity), 0)::BIGINT AS total_quantity,
                   COALESCE(SUM(o.quantity * o.price * (1 - o.discount / 100)), 0) AS total_amount
            FROM operation_groups g
            JOIN counterparties c ON c.id = g.counterparty_id
            LEFT JOIN operations o ON o.group_id = g.id
            WHERE ($1::text IS NULL OR g.comment ILIKE $1 OR c.full_name ILIKE $1)
              AND ($2::smallint IS NULL OR g.action = $2)
              AND ($3::uuid IS NULL OR g.counterparty_id = $3)
            GROUP BY g.id, c.full_name
            ORDER BY g.created_at DESC, g.id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(&search)
        .bind(filter.action)
        .bind(filter.counterparty_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let items = rows.into_iter().map(OperationGroupListItem::from).collect();
        Ok(PaginatedResponse::new(items, pagination, total.max(0) as u64))
    }

    /// Get a group with its operations and totals
    pub async fn get(&self, group_id: Uuid) -> AppResult<OperationGroupDetail> {
        let (group, counterparty_name) = self.find(group_id).await?;
        let operations = group_lines(&self.db, group_id).await?;

        let lines: Vec<LineItem> = operations.iter().map(OperationLine::line_item).collect();
        let totals = group_totals(&lines);

        Ok(OperationGroupDetail {
            group,
            counterparty_name,
            operations,
            totals,
        })
    }

    /// Create a group and its inline operations in one transaction
    pub async fn create(
        &self,
        actor: Actor,
        input: CreateOperationGroupInput,
    ) -> AppResult<OperationGroupDetail> {
        input.validate()?;
        for line in &input.operations {
            line.validate()?;
        }

        let audit = AuditFields::created(AuditStamp::now(actor));
        let mut tx = self.db.begin().await?;

        ensure_exists(&mut *tx, "counterparties", "Counterparty", input.counterparty_id).await?;

        let group_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO operation_groups (counterparty_id, action, comment,
                                          created_at, updated_at, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.counterparty_id)
        .bind(input.action)
        .bind(clean_text(input.comment))
        .bind(audit.created_at)
        .bind(audit.updated_at)
        .bind(audit.created_by)
        .bind(audit.updated_by)
        .fetch_one(&mut *tx)
        .await?;

        for line in &input.operations {
            ensure_exists(&mut *tx, "products", "Product", line.product_id).await?;
            insert_operation(
                &mut *tx,
                group_id,
                line.product_id,
                line.quantity,
                line.price,
                line.discount.unwrap_or(Decimal::ZERO),
                &audit,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            %group_id,
            action = input.action.as_str(),
            lines = input.operations.len(),
            %actor,
            "operation group created"
        );
        self.get(group_id).await
    }

    /// Update a group. Changing the action flips the stock effect of all its operations.
    pub async fn update(
        &self,
        actor: Actor,
        group_id: Uuid,
        input: UpdateOperationGroupInput,
    ) -> AppResult<OperationGroupDetail> {
        input.validate()?;

        let (mut group, _) = self.find(group_id).await?;

        if let Some(counterparty_id) = input.counterparty_id {
            ensure_exists(&self.db, "counterparties", "Counterparty", counterparty_id).await?;
            group.counterparty_id = counterparty_id;
        }
        if let Some(action) = input.action {
            group.action = action;
        }
        if let Some(comment) = input.comment {
            group.comment = clean_text(comment);
        }
        group.audit.touch(AuditStamp::now(actor));

        let result = sqlx::query(
            r#"
            UPDATE operation_groups
            SET counterparty_id = $1, action = $2, comment = $3,
                updated_at = $4, updated_by = $5
            WHERE id = $6
            "#,
        )
        .bind(group.counterparty_id)
        .bind(group.action)
        .bind(&group.comment)
        .bind(group.audit.updated_at)
        .bind(group.audit.updated_by)
        .bind(group_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Operation group".to_string()));
        }

        tracing::info!(%group_id, %actor, "operation group updated");
        self.get(group_id).await
    }

    /// Delete a group together with its operations
    pub async fn delete(&self, actor: Actor, group_id: Uuid) -> AppResult<DeletionSummary> {
        let mut tx = self.db.begin().await?;

        let operations = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM operations WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM operation_groups WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Operation group".to_string()));
        }

        tx.commit().await?;

        tracing::info!(%group_id, operations, %actor, "operation group deleted");
        Ok(DeletionSummary::new("operation_group", group_id).cascaded("operation", operations))
    }

    async fn find(&self, group_id: Uuid) -> AppResult<(OperationGroup, String)> {
        #[derive(FromRow)]
        struct Row {
            #[sqlx(flatten)]
            group: OperationGroup,
            counterparty_name: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r#"
            SELECT g.id, g.counterparty_id, g.action, g.comment,
                   g.created_at, g.updated_at, g.created_by, g.updated_by,
                   c.full_name AS counterparty_name
            FROM operation_groups g
            JOIN counterparties c ON c.id = g.counterparty_id
            WHERE g.id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Operation group".to_string()))?;

        Ok((row.group, row.counterparty_name))
    }
}
