pub mod events;
pub mod format;
pub mod request;
pub mod response;
pub mod zone;

pub use events::{EventStatus, EventType};
pub use format::{Format, FormatType};
pub use request::{BidRequest, HttpContext, Impression};
pub use response::{Ad, Asset, AssetThumb, AssetType, BidResponse, ResponseItem, ResponseMultipleItem};
pub use zone::Zone;
