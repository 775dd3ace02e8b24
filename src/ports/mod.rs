//! Port traits defining external boundaries.
//!
//! Each trait is a seam between the collection core and something it does
//! not own: the description generator, the store of record, the clock and
//! the filesystem. Implementations live in `src/adapters/`.

pub mod clock;
pub mod describer;
pub mod filesystem;
pub mod sink;

pub use clock::Clock;
pub use describer::{DescribeFuture, DescribeRequest, DescriptionGenerator, ProviderError};
pub use filesystem::FileSystem;
pub use sink::{CollectionSink, CommitError};
