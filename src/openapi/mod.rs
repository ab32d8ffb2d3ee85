use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BizTime API",
        version = "1.0.0",
        description = r#"
# BizTime

Companies and the invoices billed to them.

## Paid dates

Setting `paid` to `true` stamps `paid_date` with today's date unless the
invoice already has one. Setting it to `false` clears the date.

## Error Handling

Every failure uses the same body:

```json
{
  "error": "Not Found",
  "message": "Company nope does not exist",
  "status": 404,
  "kind": "not_found",
  "request_id": "5f0c6d1e-3d65-4a44-9f1a-6f4f8f0b2a11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "companies", description = "Company endpoints"),
        (name = "invoices", description = "Invoice endpoints"),
        (name = "health", description = "Liveness and readiness checks")
    ),
    paths(
        crate::handlers::companies::list_companies,
        crate::handlers::companies::get_company,
        crate::handlers::companies::create_company,
        crate::handlers::companies::update_company,
        crate::handlers::companies::delete_company,
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::update_invoice,
        crate::handlers::invoices::delete_invoice,
        crate::health::simple_health_check,
        crate::health::readiness_check
    ),
    components(
        schemas(
            crate::entities::company::Model,
            crate::entities::invoice::Model,
            crate::services::companies::CompanySummary,
            crate::services::invoices::InvoiceSummary,
            crate::handlers::companies::CreateCompanyRequest,
            crate::handlers::companies::UpdateCompanyRequest,
            crate::handlers::companies::CompanyInvoice,
            crate::handlers::companies::CompanyDetail,
            crate::handlers::companies::CompanyDetailResponse,
            crate::handlers::companies::CompanyResponse,
            crate::handlers::invoices::CreateInvoiceRequest,
            crate::handlers::invoices::UpdateInvoiceRequest,
            crate::handlers::invoices::InvoiceDetail,
            crate::handlers::invoices::InvoiceDetailResponse,
            crate::handlers::invoices::InvoiceResponse,
            crate::handlers::common::DeletedResponse,
            crate::health::HealthResponse,
            crate::health::ReadinessResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource_route() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("BizTime API"));
        for path in [
            "/companies",
            "/companies/{code}",
            "/invoices",
            "/invoices/{id}",
            "/health/ready",
        ] {
            assert!(
                openapi.paths.paths.contains_key(path),
                "missing path {}",
                path
            );
        }
        assert!(json.contains("ErrorResponse"));
    }
}
