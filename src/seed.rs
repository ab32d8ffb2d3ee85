//! Demo rows: two companies and three invoices.

use crate::entities::{company, invoice};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use tracing::info;

/// Counts of rows written by [`seed_demo_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub companies: usize,
    pub invoices: usize,
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DbErr> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DbErr::Custom(format!("invalid date {}-{}-{}", year, month, day)))
}

/// Inserts `apple` and `ibm` plus their invoices. Invoice ids are assigned by
/// the store, so on an empty table they come out as 1, 2 and 3.
pub async fn seed_demo_data<C: ConnectionTrait>(db: &C) -> Result<SeedSummary, DbErr> {
    let companies = [
        ("apple", "Apple", "Maker of OSX."),
        ("ibm", "IBM", "Big blue."),
    ];
    for (code, name, description) in companies {
        company::ActiveModel {
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
        }
        .insert(db)
        .await?;
    }

    let invoices = [
        ("apple", 100.0, false, date(2018, 1, 1)?, None),
        ("apple", 200.0, true, date(2018, 2, 1)?, Some(date(2018, 2, 2)?)),
        ("ibm", 300.0, false, date(2018, 3, 1)?, None),
    ];
    for (comp_code, amt, paid, add_date, paid_date) in invoices {
        invoice::ActiveModel {
            comp_code: Set(comp_code.to_string()),
            amt: Set(amt),
            paid: Set(paid),
            add_date: Set(add_date),
            paid_date: Set(paid_date),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!(
        companies = companies.len(),
        invoices = invoices.len(),
        "Seeded demo data"
    );
    Ok(SeedSummary {
        companies: companies.len(),
        invoices: invoices.len(),
    })
}
