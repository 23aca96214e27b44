//! External collaborators the utilities call out to
//!
//! Each collaborator sits behind a trait so the services can be driven by
//! stubs in tests: the vendor download page is fetched through a
//! [`PageFetcher`] and live infrastructure facts come from [`InfraOutputs`].

pub mod http;
pub mod terragrunt;

pub use http::{HttpPageFetcher, PageFetcher};
pub use terragrunt::{InfraOutputs, Terragrunt};
