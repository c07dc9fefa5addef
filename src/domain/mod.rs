mod item;
mod message;
pub(crate) mod ports;
pub(crate) mod reference;

pub use item::{
    CatalogEntry, ItemRecord, PageExtras, PlatformFlags, ReviewSummary, NO_REVIEW_DATA, UNKNOWN,
};
pub use message::InboundMessage;
