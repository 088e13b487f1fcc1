//! Concrete job search providers.
//!
//! Each provider implements [`jobmatch_rank::SearchProvider`] over one HTTP
//! API and is registered under its [`NAME`](jsearch::NAME).

pub mod jsearch;
pub mod linkup;

pub use jsearch::JSearchProvider;
pub use linkup::LinkUpProvider;
