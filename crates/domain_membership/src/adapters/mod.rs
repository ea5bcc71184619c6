//! Adapters for the membership ports

pub mod fluent_countries;

pub use fluent_countries::FluentCountryCatalog;
