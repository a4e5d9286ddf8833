pub mod handlers;

pub use handlers::handle_bid_request;
