//! Each of the below modules implements one orchestration pattern in two
//! ways. Each module is structured as follows (where `pattern` is the module
//! name):
//!
//! ```
//! pub mod pattern {
//!     //! Types shared by both implementations (outcomes, winners) live at
//!     //! the top of the module. The functions in the auto and manual
//!     //! modules are functionally identical and share one test suite.
//!
//!     pub mod auto {
//!         pub async fn pattern() {
//!            // composed from async-await and futures-lite combinators.
//!         }
//!     }
//!
//!     pub mod manual {
//!         pub async fn pattern() {
//!             // drives a struct which implements [`std::future::Future`]
//!             // by hand.
//!         }
//!     }
//! }
//! ```

pub mod cancellable_delay;
pub mod chain;
pub mod join_all;
pub mod race;
