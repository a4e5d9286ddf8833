pub mod engine;
pub mod error;
pub mod token;

pub use engine::{process_bid_request, TransformedBid};
pub use error::{BidError, BodyReadError, ErrorKind};
pub use token::{AlphanumericToken, TokenGenerator};
