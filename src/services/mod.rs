//! Core services for remote listing, fetching, aggregation and reporting

pub mod aggregate;
pub mod document;
pub mod fetch;
pub mod format;
pub mod identity;
pub mod remote;
pub mod report;
pub mod select;
