//! Catalogue Loading - 内容目录加载

mod json_loader;

pub use json_loader::{load_catalogue, parse_catalogue, CatalogueError, CatalogueFile};
