//! Quote gateway: genre normalization, strategy dispatch and response shaping.
//!
//! # Data Flow
//! ```text
//! ?genre=...
//!     → Genre::normalize (trim, lowercase, default "inspirational")
//!     → QuoteGateway::source_for
//!         humor | fun → JokeSource     (joke API)
//!         otherwise   → QuotableSource (quote API, ?tags=<genre>)
//!     → GatewayResponse (always produced, failures included)
//! ```

pub mod engine;
pub mod joke;
pub mod quotable;
pub mod source;
pub mod types;

pub use engine::QuoteGateway;
pub use joke::JokeSource;
pub use quotable::QuotableSource;
pub use source::QuoteSource;
pub use types::{GatewayResponse, Genre, Quotation, DEFAULT_GENRE};
