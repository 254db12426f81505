//! Feature retrieval against heterogeneous WFS endpoints.
//!
//! [`FallbackSearch`] walks every (field, layer, version) combination of a
//! [`CandidateSet`] through the [`ProtocolNegotiator`] until a returned
//! record carries the queried ID. HTTP goes through the [`Transport`] trait
//! so tests can substitute a fake or a local mock server.

pub mod candidates;
pub mod negotiator;
pub mod search;
pub mod transport;

pub use candidates::{search_plan, Attempt, CandidateSet, SearchAxis, SearchConfig, SearchPolicy};
pub use negotiator::ProtocolNegotiator;
pub use search::FallbackSearch;
pub use transport::{ReqwestTransport, Transport};
