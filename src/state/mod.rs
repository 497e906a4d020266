//! Client-side list state: view parameters, debounced search, sort and
//! selection for the product table.

pub mod search;
pub mod selection;
pub mod sort;
pub mod store;

pub use search::{SearchController, SearchPhase};
pub use sort::SortKey;
pub use store::{ListStore, ParamsChange};
