use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "invoices")]
#[schema(as = Invoice)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    /// Set when the invoice transitions to paid, cleared when it is unpaid again
    pub paid_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompCode",
        to = "super::company::Column::Code",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if active_model.paid.is_not_set() {
                active_model.paid = Set(false);
            }
            if active_model.add_date.is_not_set() {
                active_model.add_date = Set(Utc::now().date_naive());
            }
            if active_model.paid_date.is_not_set() {
                active_model.paid_date = Set(None);
            }
        }

        Ok(active_model)
    }
}
