use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Registers the `x-admin-secret` header scheme referenced by the admin paths.
struct AdminSecurity;

impl Modify for AdminSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "AdminSecret",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-admin-secret",
                    "Shared operator secret for the admin subtree",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Defter API",
        version = "0.3.0",
        description = r#"
# Defter Back Office API

A multi-tenant back office for small businesses: product and stock tracking,
customers, sales with VAT totals, payments, returns, expenses, cash and bank
accounts, and quotes.

## Tenancy

Every business endpoint is scoped to a tenant. Pass the tenant's user id as a
`user_id` query parameter on each request:

```
GET /api/v1/products?user_id=550e8400-e29b-41d4-a716-446655440000
```

Records belonging to other tenants are invisible; requesting them returns 404.

## Admin endpoints

Endpoints under `/api/v1/admin` manage tenants and subscription plans. They
are guarded by a shared secret sent in the `x-admin-secret` header. A wrong or
missing secret returns 401; if the server has no secret configured, the whole
subtree answers 500.

## Pagination

List endpoints accept `page` (default 1) and `per_page` (default 20, max 100)
query parameters and respond with a paginated envelope carrying `total` and
`total_pages`.

## Errors

Errors share a single body shape:

```json
{
  "error": "Unprocessable Entity",
  "message": "Validation failed",
  "details": { "items[0].quantity": ["must be greater than zero"] },
  "request_id": "req-abc123xyz",
  "timestamp": "2024-06-09T10:30:00.000Z"
}
```

Validation failures (422) list every offending field under `details`, with
array elements addressed by index.
        "#,
        contact(
            name = "Defter Support",
            email = "destek@defter.app",
            url = "https://defter.app"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "https://api.defter.app", description = "Production server"),
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product and stock endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Warehouses", description = "Warehouse endpoints"),
        (name = "Sales", description = "Sale and invoicing endpoints"),
        (name = "Payments", description = "Customer payment collection endpoints"),
        (name = "Returns", description = "Sales return endpoints"),
        (name = "Expenses", description = "Expense tracking endpoints"),
        (name = "Accounts", description = "Cash and bank account endpoints"),
        (name = "Quotes", description = "Quote and offer endpoints"),
        (name = "Admin", description = "Tenant and plan administration endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::list_products,
        crate::handlers::products::list_low_stock_products,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Customers
        crate::handlers::customers::create_customer,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,

        // Warehouses
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::set_default_warehouse,
        crate::handlers::warehouses::delete_warehouse,

        // Sales
        crate::handlers::sales::create_sale,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::list_sales,
        crate::handlers::sales::update_sale,
        crate::handlers::sales::issue_invoice,
        crate::handlers::sales::delete_sale,

        // Payments
        crate::handlers::payments::create_payment,
        crate::handlers::payments::get_payment,
        crate::handlers::payments::list_payments,
        crate::handlers::payments::delete_payment,

        // Returns
        crate::handlers::returns::create_return,
        crate::handlers::returns::get_return,
        crate::handlers::returns::list_returns,
        crate::handlers::returns::update_return,
        crate::handlers::returns::delete_return,

        // Expenses
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::get_expense,
        crate::handlers::expenses::list_expenses,
        crate::handlers::expenses::update_expense,
        crate::handlers::expenses::delete_expense,

        // Accounts
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::list_accounts,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::transfer,
        crate::handlers::accounts::delete_account,

        // Quotes
        crate::handlers::quotes::create_quote,
        crate::handlers::quotes::get_quote,
        crate::handlers::quotes::list_quotes,
        crate::handlers::quotes::update_quote,
        crate::handlers::quotes::delete_quote,

        // Admin
        crate::handlers::admin::list_users,
        crate::handlers::admin::get_user,
        crate::handlers::admin::set_user_activation,
        crate::handlers::admin::assign_user_plan,
        crate::handlers::admin::create_plan,
        crate::handlers::admin::list_plans,
        crate::handlers::admin::get_plan,
        crate::handlers::admin::update_plan,
        crate::handlers::admin::delete_plan,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::PaginatedResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            // Entity models
            crate::entities::product::Model,
            crate::entities::customer::Model,
            crate::entities::warehouse::Model,
            crate::entities::sale::Model,
            crate::entities::sale_item::Model,
            crate::entities::payment::Model,
            crate::entities::payment::PaymentMethod,
            crate::entities::sales_return::Model,
            crate::entities::expense::Model,
            crate::entities::account::Model,
            crate::entities::account::AccountKind,
            crate::entities::quote::Model,
            crate::entities::plan::Model,
            crate::entities::user::Model,

            // Composite responses
            crate::services::sales::SaleWithItems,
            crate::services::accounts::TransferOutcome,

            // Product types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,

            // Customer types
            crate::handlers::customers::CreateCustomerRequest,
            crate::handlers::customers::UpdateCustomerRequest,

            // Warehouse types
            crate::handlers::warehouses::CreateWarehouseRequest,
            crate::handlers::warehouses::UpdateWarehouseRequest,

            // Sale types
            crate::handlers::sales::CreateSaleRequest,
            crate::handlers::sales::CreateSaleItemRequest,
            crate::handlers::sales::UpdateSaleRequest,
            crate::handlers::sales::IssueInvoiceRequest,

            // Payment types
            crate::handlers::payments::CreatePaymentRequest,

            // Return types
            crate::handlers::returns::CreateReturnRequest,
            crate::handlers::returns::CreateReturnItemRequest,
            crate::handlers::returns::UpdateReturnRequest,

            // Expense types
            crate::handlers::expenses::CreateExpenseRequest,
            crate::handlers::expenses::UpdateExpenseRequest,

            // Account types
            crate::handlers::accounts::CreateAccountRequest,
            crate::handlers::accounts::UpdateAccountRequest,
            crate::handlers::accounts::TransferRequest,

            // Quote types
            crate::handlers::quotes::CreateQuoteRequest,
            crate::handlers::quotes::CreateQuoteItemRequest,
            crate::handlers::quotes::UpdateQuoteRequest,

            // Admin types
            crate::handlers::admin::CreatePlanRequest,
            crate::handlers::admin::UpdatePlanRequest,
            crate::handlers::admin::SetActivationRequest,
            crate::handlers::admin::AssignPlanRequest,
        )
    ),
    modifiers(&AdminSecurity)
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Defter API"));
        assert!(json.contains("/api/v1/products"));
        assert!(json.contains("/api/v1/admin/plans"));
        assert!(json.contains("x-admin-secret"));
    }
}
