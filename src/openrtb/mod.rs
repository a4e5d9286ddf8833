pub mod request;

pub use request::{BidRequest, Imp};
