//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use hasher_core::testing::FailingDigester;
//!
//! let service = HashService::with_components(
//!     Arc::new(MemoryResultStore::new()),
//!     Arc::new(FailingDigester::new()),
//!     Duration::ZERO,
//! );
//! ```

mod mock_digester;

pub use mock_digester::{FailingDigester, RecordingDigester};
