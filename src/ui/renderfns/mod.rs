pub mod header;
pub mod utils;

pub use header::{draw_header, extract_domain};
pub use utils::{
  format_price, page_window, range_label, rating_style, stock_bars, truncate,
};
