pub mod chat;
pub mod filter;
pub mod record;
pub mod reply;

pub use chat::*;
pub use filter::*;
pub use record::*;
pub use reply::*;
