pub mod movie;
pub mod catalog_page;
pub mod category;
pub mod notice;

pub use movie::Movie;
pub use catalog_page::CatalogPage;
pub use category::{MovieCategory, ParseCategoryError};
pub use notice::Notice;
