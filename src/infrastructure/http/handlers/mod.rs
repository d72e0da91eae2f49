//! HTTP Handlers

mod page;
mod page_socket;
mod ping;
mod topics;

pub use page::*;
pub use page_socket::*;
pub use ping::*;
pub use topics::*;
