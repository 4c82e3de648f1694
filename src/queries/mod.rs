//! Aggregation queries over the loaded `transactions` table.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods returning
//! `Result<T>` with typed model payloads.

pub mod products;
pub mod rolling;
pub mod transactions;

pub use products::ProductQuery;
pub use rolling::RollingQuery;
pub use transactions::TransactionQuery;
