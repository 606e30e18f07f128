//! Quote management module.
//!
//! - [`model`] - Quote, line items, pricing parameters and totals
//! - [`pricing`] - Pure pricing calculator
//! - [`reducer`] - Closed set of edits and the function applying them
//! - [`persistence`] - Remote storage trait
//! - [`store`] - Lifecycle of the single active quote
//!
//! # Architecture
//!
//! ```text
//! QuoteStore --dispatch--> reduce --> recalculate
//!     |
//!     +--save/load/confirm/delete--> QuotePersistenceTrait (HTTP client)
//! ```
//!
//! Models and the calculator have no I/O. Only the store talks to the
//! persistence layer, and only through the trait.

pub mod model;
pub mod persistence;
pub mod pricing;
pub mod reducer;
pub mod store;

#[cfg(test)]
mod model_tests;

pub use model::{
    LaborItem, LaborItemInput, NewQuote, PricingParams, Quote, QuoteTotals, SupplyItem,
    SupplyItemInput,
};
pub use persistence::QuotePersistenceTrait;
pub use pricing::{
    compute_item_totals, compute_totals, recalculate, round_for_display, validate_rates,
    PricedItem,
};
pub use reducer::{reduce, QuoteAction};
pub use store::{QuoteState, QuoteStatus, QuoteStore};
