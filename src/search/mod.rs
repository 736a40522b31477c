pub mod client;
pub mod clock;
pub mod coordinator;
pub mod errors;
pub mod filter;
pub mod gate;
pub mod traits;

pub use client::HttpSearchBackend;
pub use clock::{Clock, SystemClock};
pub use coordinator::{Dispatch, RequestCoordinator, RequestState};
pub use errors::SearchError;
pub use filter::{display_price, filter_hits, Category};
pub use gate::{BlockReason, CooldownState};
pub use traits::SearchBackend;
