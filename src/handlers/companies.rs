use super::common::{validate_input, DeletedResponse, JsonBody, PathParam};
use crate::{
    entities::{company, invoice},
    errors::{ErrorResponse, ServiceError},
    services::companies::{CompanySummary, CompanyWithInvoices, CreateCompanyInput},
    AppState,
};
use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "code": "apple",
    "name": "Apple Computer",
    "description": "Maker of OSX."
}))]
pub struct CreateCompanyRequest {
    /// Unique company code; derived from `name` when omitted
    #[validate(length(min = 1))]
    #[schema(example = "apple")]
    pub code: Option<String>,
    #[validate(length(min = 1))]
    #[schema(example = "Apple Computer")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Apple Inc.",
    "description": "Maker of macOS."
}))]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1))]
    pub name: String,
    /// Omitted or `null` clears the description
    pub description: Option<String>,
}

/// Invoice as listed under its company
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyInvoice {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl From<invoice::Model> for CompanyInvoice {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            amt: model.amt,
            paid: model.paid,
            add_date: model.add_date,
            paid_date: model.paid_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub invoices: Vec<CompanyInvoice>,
}

impl From<CompanyWithInvoices> for CompanyDetail {
    fn from(found: CompanyWithInvoices) -> Self {
        Self {
            code: found.company.code,
            name: found.company.name,
            description: found.company.description,
            invoices: found.invoices.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "company": {
        "code": "apple",
        "name": "Apple",
        "description": "Maker of OSX.",
        "invoices": [
            {"id": 1, "amt": 100.0, "paid": false, "add_date": "2018-01-01", "paid_date": null}
        ]
    }
}))]
pub struct CompanyDetailResponse {
    pub company: CompanyDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub company: company::Model,
}

#[utoipa::path(
    get,
    path = "/companies",
    responses(
        (status = 200, description = "Every company as (code, name)", body = [CompanySummary]),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompanySummary>>, ServiceError> {
    let companies = state.services.companies.list_companies().await?;
    Ok(Json(companies))
}

#[utoipa::path(
    get,
    path = "/companies/{code}",
    params(("code" = String, Path, description = "Company code")),
    responses(
        (status = 200, description = "Company with its invoices", body = CompanyDetailResponse),
        (status = 404, description = "No such company", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn get_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
) -> Result<Json<CompanyDetailResponse>, ServiceError> {
    let found = state.services.companies.get_company(&code).await?;
    Ok(Json(CompanyDetailResponse {
        company: found.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 200, description = "Inserted row", body = [company::Model]),
        (status = 500, description = "Duplicate code or malformed body", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn create_company(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCompanyRequest>,
) -> Result<Json<Vec<company::Model>>, ServiceError> {
    validate_input(&payload)?;

    let created = state
        .services
        .companies
        .create_company(CreateCompanyInput {
            code: payload.code,
            name: payload.name,
            description: payload.description,
        })
        .await?;

    Ok(Json(vec![created]))
}

#[utoipa::path(
    put,
    path = "/companies/{code}",
    params(("code" = String, Path, description = "Company code")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 404, description = "No such company", body = ErrorResponse),
        (status = 500, description = "Malformed body", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn update_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
    JsonBody(payload): JsonBody<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, ServiceError> {
    validate_input(&payload)?;

    let company = state
        .services
        .companies
        .update_company(&code, payload.name, payload.description)
        .await?;

    Ok(Json(CompanyResponse { company }))
}

#[utoipa::path(
    delete,
    path = "/companies/{code}",
    params(("code" = String, Path, description = "Company code")),
    responses(
        (status = 200, description = "Company and its invoices deleted", body = DeletedResponse),
        (status = 404, description = "No such company", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn delete_company(
    State(state): State<AppState>,
    PathParam(code): PathParam<String>,
) -> Result<Json<DeletedResponse>, ServiceError> {
    state.services.companies.delete_company(&code).await?;
    Ok(Json(DeletedResponse::new()))
}

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route(
            "/:code",
            get(get_company).put(update_company).delete(delete_company),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_invoices_without_company_code() {
        let detail = CompanyDetail::from(CompanyWithInvoices {
            company: company::Model {
                code: "apple".into(),
                name: "Apple".into(),
                description: None,
            },
            invoices: vec![invoice::Model {
                id: 7,
                comp_code: "apple".into(),
                amt: 100.0,
                paid: false,
                add_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
                paid_date: None,
            }],
        });

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["invoices"][0]["id"], 7);
        assert_eq!(json["invoices"][0]["add_date"], "2018-01-01");
        assert!(json["invoices"][0].get("comp_code").is_none());
    }
}
