mod login;
mod product_detail;
mod product_list;

pub use login::LoginView;
pub use product_detail::ProductDetailView;
pub use product_list::ProductListView;
