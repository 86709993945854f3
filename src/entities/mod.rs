//! Entity module - sea-orm definitions for every table the back office reads or writes.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod customer;
pub mod expense;
pub mod other_transaction;
pub mod purchase;
pub mod sale;
pub mod store;
pub mod studio_ledger;
pub mod vendor;

// Re-export specific types to avoid conflicts
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use other_transaction::{
    Column as OtherTransactionColumn, Entity as OtherTransaction, Model as OtherTransactionModel,
};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use store::{Column as StoreColumn, Entity as Store, Model as StoreModel};
pub use studio_ledger::{
    Column as StudioLedgerColumn, Entity as StudioLedger, Model as StudioLedgerModel,
};
pub use vendor::{Column as VendorColumn, Entity as Vendor, Model as VendorModel};
