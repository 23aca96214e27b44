pub mod fakes;
pub mod helpers;

#[allow(unused_imports)]
pub use fakes::{MemoryBucket, StubFetcher, StubInfra};
#[allow(unused_imports)]
pub use helpers::{TestEnv, unique_workspace};
