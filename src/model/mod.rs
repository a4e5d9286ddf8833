pub mod context;
pub mod ext;

pub use context::BidContext;
pub use ext::ExtensionPayload;
