// Business logic over the two BizTime tables
pub mod companies;
pub mod invoices;

pub use companies::CompanyService;
pub use invoices::InvoiceService;
