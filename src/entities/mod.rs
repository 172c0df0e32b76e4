//! sea-orm entity definitions, one module per table.

pub mod account;
pub mod customer;
pub mod expense;
pub mod password_reset_token;
pub mod payment;
pub mod plan;
pub mod product;
pub mod quote;
pub mod sale;
pub mod sale_item;
pub mod sales_return;
pub mod user;
pub mod user_session;
pub mod warehouse;

pub use account::AccountKind;
pub use payment::PaymentMethod;
