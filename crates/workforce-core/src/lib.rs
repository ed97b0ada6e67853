//! Core types and the report catalog for the workforce analytics library.
//!
//! Everything here operates on an immutable [`FactTable`] snapshot of the
//! canonical `main_table`. This crate is deliberately free of database and
//! I/O dependencies; storage backends implement [`source::FactSource`].

pub mod employee;
pub mod error;
pub mod report;
pub mod source;
pub mod stats;
pub mod table;

pub use employee::{Column, Employee};
pub use error::{Error, Result};
pub use report::{ReportContext, ReportKind, ReportRows};
pub use table::{EmployeeFilter, FactTable};
