mod footer;
mod input;
mod key_result;
mod product_form;
mod search_input;

pub use footer::draw_footer;
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use product_form::{AddProductDialog, DialogEvent};
pub use search_input::{SearchEvent, SearchInput};
