use crate::{
    db::DbPool,
    entities::{company, invoice},
    errors::ServiceError,
};
use chrono::NaiveDate;
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// `(id, comp_code)` projection used by the invoice listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// An invoice together with the company it is billed to
#[derive(Debug, Clone)]
pub struct InvoiceWithCompany {
    pub invoice: invoice::Model,
    pub company: company::Model,
}

/// New value of `paid_date` for an update that sets `paid`.
///
/// Paying keeps an existing date and stamps `today` otherwise; unpaying
/// always clears it. Evaluated by the store inside the UPDATE so the decision
/// sees the row as it is being written.
pub fn paid_date_expr(paid: bool, today: NaiveDate) -> SimpleExpr {
    if paid {
        Func::coalesce([Expr::col(invoice::Column::PaidDate).into(), Expr::value(today)]).into()
    } else {
        Expr::value(Option::<NaiveDate>::None)
    }
}

/// Service for managing invoices
#[derive(Clone)]
pub struct InvoiceService {
    db_pool: Arc<DbPool>,
}

impl InvoiceService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists `(id, comp_code)` for every invoice ordered by id
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceSummary>, ServiceError> {
        let db = self.db_pool.as_ref();
        let invoices = invoice::Entity::find()
            .select_only()
            .column(invoice::Column::Id)
            .column(invoice::Column::CompCode)
            .order_by_asc(invoice::Column::Id)
            .into_model::<InvoiceSummary>()
            .all(db)
            .await?;

        Ok(invoices)
    }

    /// Fetches an invoice joined with its company
    #[instrument(skip(self))]
    pub async fn get_invoice(&self, id: i32) -> Result<InvoiceWithCompany, ServiceError> {
        let db = self.db_pool.as_ref();
        let (invoice, company) = invoice::Entity::find_by_id(id)
            .find_also_related(company::Entity)
            .one(db)
            .await?
            .ok_or_else(|| not_found(id))?;

        // Only reachable if the foreign key is not enforced by the store
        let company = company.ok_or_else(|| not_found(id))?;

        Ok(InvoiceWithCompany { invoice, company })
    }

    /// Inserts an unpaid invoice dated today
    #[instrument(skip(self))]
    pub async fn create_invoice(
        &self,
        comp_code: String,
        amt: f64,
    ) -> Result<invoice::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let created = invoice::ActiveModel {
            comp_code: Set(comp_code),
            amt: Set(amt),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(id = created.id, comp_code = %created.comp_code, "Invoice created");
        Ok(created)
    }

    /// Sets `amt` and `paid` and moves `paid_date` accordingly, as one statement
    #[instrument(skip(self))]
    pub async fn update_invoice(
        &self,
        id: i32,
        amt: f64,
        paid: bool,
        today: NaiveDate,
    ) -> Result<invoice::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let updated = invoice::Entity::update_many()
            .col_expr(invoice::Column::Amt, Expr::value(amt))
            .col_expr(invoice::Column::Paid, Expr::value(paid))
            .col_expr(invoice::Column::PaidDate, paid_date_expr(paid, today))
            .filter(invoice::Column::Id.eq(id))
            .exec_with_returning(db)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(id))?;

        info!(id, paid, paid_date = ?updated.paid_date, "Invoice updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: i32) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let result = invoice::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        info!(id, "Invoice deleted");
        Ok(())
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("Invoice {} does not exist", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{
        sea_query::{PostgresQueryBuilder, Query},
        DbBackend, QueryTrait,
    };

    fn update_sql(paid: bool) -> String {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        invoice::Entity::update_many()
            .col_expr(invoice::Column::PaidDate, paid_date_expr(paid, today))
            .filter(invoice::Column::Id.eq(1))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn paying_keeps_existing_date_or_stamps_today() {
        let sql = update_sql(true);
        assert!(
            sql.contains(r#""paid_date" = COALESCE("paid_date", '2024-03-01')"#),
            "{}",
            sql
        );
    }

    #[test]
    fn unpaying_clears_the_date() {
        let sql = update_sql(false);
        assert!(sql.contains(r#""paid_date" = NULL"#), "{}", sql);
    }

    #[test]
    fn expression_renders_without_table_prefix() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (sql, _) = Query::select()
            .expr(paid_date_expr(true, today))
            .build(PostgresQueryBuilder);
        assert!(sql.starts_with(r#"SELECT COALESCE("paid_date""#), "{}", sql);
    }
}
