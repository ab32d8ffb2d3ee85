use super::common::{validate_input, DeletedResponse, JsonBody, PathParam};
use crate::{
    entities::{company, invoice},
    errors::{ErrorResponse, ServiceError},
    services::invoices::{InvoiceSummary, InvoiceWithCompany},
    AppState,
};
use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"comp_code": "apple", "amt": 250.0}))]
pub struct CreateInvoiceRequest {
    /// Code of the company being billed
    #[validate(length(min = 1))]
    #[schema(example = "apple")]
    pub comp_code: String,
    #[schema(example = 250.0)]
    pub amt: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"amt": 5000.0, "paid": true}))]
pub struct UpdateInvoiceRequest {
    pub amt: f64,
    /// Paying stamps today's date unless already paid; unpaying clears it
    pub paid: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceDetail {
    pub id: i32,
    pub company: company::Model,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

impl From<InvoiceWithCompany> for InvoiceDetail {
    fn from(found: InvoiceWithCompany) -> Self {
        let InvoiceWithCompany { invoice, company } = found;
        Self {
            id: invoice.id,
            company,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "invoice": {
        "id": 1,
        "company": {"code": "apple", "name": "Apple", "description": "Maker of OSX."},
        "amt": 100.0,
        "paid": false,
        "add_date": "2018-01-01",
        "paid_date": null
    }
}))]
pub struct InvoiceDetailResponse {
    pub invoice: InvoiceDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub invoice: invoice::Model,
}

#[utoipa::path(
    get,
    path = "/invoices",
    responses(
        (status = 200, description = "Every invoice as (id, comp_code)", body = [InvoiceSummary]),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceSummary>>, ServiceError> {
    let invoices = state.services.invoices.list_invoices().await?;
    Ok(Json(invoices))
}

#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice with its company", body = InvoiceDetailResponse),
        (status = 404, description = "No such invoice", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<InvoiceDetailResponse>, ServiceError> {
    let found = state.services.invoices.get_invoice(id).await?;
    Ok(Json(InvoiceDetailResponse {
        invoice: found.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 200, description = "Inserted row", body = [invoice::Model]),
        (status = 500, description = "Unknown company or malformed body", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateInvoiceRequest>,
) -> Result<Json<Vec<invoice::Model>>, ServiceError> {
    validate_input(&payload)?;

    let created = state
        .services
        .invoices
        .create_invoice(payload.comp_code, payload.amt)
        .await?;

    Ok(Json(vec![created]))
}

#[utoipa::path(
    put,
    path = "/invoices/{id}",
    params(("id" = i32, Path, description = "Invoice id")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Updated invoice", body = InvoiceResponse),
        (status = 404, description = "No such invoice", body = ErrorResponse),
        (status = 500, description = "Malformed body", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, ServiceError> {
    let today = Utc::now().date_naive();
    let invoice = state
        .services
        .invoices
        .update_invoice(id, payload.amt, payload.paid, today)
        .await?;

    Ok(Json(InvoiceResponse { invoice }))
}

#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice deleted", body = DeletedResponse),
        (status = 404, description = "No such invoice", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<DeletedResponse>, ServiceError> {
    state.services.invoices.delete_invoice(id).await?;
    Ok(Json(DeletedResponse::new()))
}

pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}
