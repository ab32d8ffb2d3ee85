use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20180101_000001_create_companies_table::Migration),
            Box::new(m20180101_000002_create_invoices_table::Migration),
        ]
    }
}

mod m20180101_000001_create_companies_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20180101_000001_create_companies_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Companies::Code)
                                .text()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Companies::Name).text().not_null())
                        .col(ColumnDef::new(Companies::Description).text().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Companies {
        Table,
        Code,
        Name,
        Description,
    }
}

mod m20180101_000002_create_invoices_table {
    use super::m20180101_000001_create_companies_table::Companies;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20180101_000002_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Invoices::CompCode).text().not_null())
                        .col(ColumnDef::new(Invoices::Amt).double().not_null())
                        .col(
                            ColumnDef::new(Invoices::Paid)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Invoices::AddDate)
                                .date()
                                .not_null()
                                .default(Expr::current_date()),
                        )
                        .col(ColumnDef::new(Invoices::PaidDate).date().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_comp_code")
                                .from(Invoices::Table, Invoices::CompCode)
                                .to(Companies::Table, Companies::Code)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_invoices_comp_code")
                        .table(Invoices::Table)
                        .col(Invoices::CompCode)
                        .if_not_exists()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        CompCode,
        Amt,
        Paid,
        AddDate,
        PaidDate,
    }
}
