use crate::{
    db::DbPool,
    entities::{company, invoice},
    errors::ServiceError,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// `(code, name)` projection used by the company listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// A company together with every invoice billed to it
#[derive(Debug, Clone)]
pub struct CompanyWithInvoices {
    pub company: company::Model,
    pub invoices: Vec<invoice::Model>,
}

#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Derived from `name` when absent
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// Lowercases `name` and collapses every run of non-alphanumeric characters
/// into a single `-`, e.g. `"Big Blue, Inc."` becomes `"big-blue-inc"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Service for managing companies
#[derive(Clone)]
pub struct CompanyService {
    db_pool: Arc<DbPool>,
}

impl CompanyService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists `(code, name)` for every company in store order
    #[instrument(skip(self))]
    pub async fn list_companies(&self) -> Result<Vec<CompanySummary>, ServiceError> {
        let db = self.db_pool.as_ref();
        let companies = company::Entity::find()
            .select_only()
            .column(company::Column::Code)
            .column(company::Column::Name)
            .into_model::<CompanySummary>()
            .all(db)
            .await?;

        Ok(companies)
    }

    /// Fetches a company and its invoices with a single joined query
    #[instrument(skip(self))]
    pub async fn get_company(&self, code: &str) -> Result<CompanyWithInvoices, ServiceError> {
        let db = self.db_pool.as_ref();
        let (company, invoices) = company::Entity::find_by_id(code.to_owned())
            .find_with_related(invoice::Entity)
            .order_by_asc(invoice::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(code))?;

        Ok(CompanyWithInvoices { company, invoices })
    }

    /// Inserts a company; a duplicate code is rejected by the store
    #[instrument(skip(self))]
    pub async fn create_company(
        &self,
        input: CreateCompanyInput,
    ) -> Result<company::Model, ServiceError> {
        let code = match input.code {
            Some(code) => code,
            None => slugify(&input.name),
        };
        if code.is_empty() {
            return Err(ServiceError::ValidationError(
                "company code cannot be empty".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        let created = company::ActiveModel {
            code: Set(code),
            name: Set(input.name),
            description: Set(input.description),
        }
        .insert(db)
        .await?;

        info!(code = %created.code, "Company created");
        Ok(created)
    }

    /// Replaces `name` and `description` of an existing company
    #[instrument(skip(self))]
    pub async fn update_company(
        &self,
        code: &str,
        name: String,
        description: Option<String>,
    ) -> Result<company::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let updated = company::Entity::update_many()
            .col_expr(company::Column::Name, Expr::value(name))
            .col_expr(company::Column::Description, Expr::value(description))
            .filter(company::Column::Code.eq(code))
            .exec_with_returning(db)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| not_found(code))?;

        Ok(updated)
    }

    /// Deletes a company; its invoices follow through the foreign key cascade
    #[instrument(skip(self))]
    pub async fn delete_company(&self, code: &str) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let result = company::Entity::delete_by_id(code.to_owned())
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(not_found(code));
        }

        info!(code = %code, "Company deleted");
        Ok(())
    }
}

fn not_found(code: &str) -> ServiceError {
    ServiceError::NotFound(format!("Company {} does not exist", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Apple", "apple")]
    #[case("TestName", "testname")]
    #[case("  Big Blue, Inc. ", "big-blue-inc")]
    #[case("AT&T", "at-t")]
    #[case("---", "")]
    fn slugify_cases(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name), expected);
    }
}
