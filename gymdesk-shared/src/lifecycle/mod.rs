/// Membership lifecycle engine
///
/// Pure computation over membership dates. Nothing in this module touches the
/// store; callers pass in the record values and a reference "now".
///
/// # Modules
///
/// - [`status`]: three-tier and binary status classification
/// - [`renewal`]: allowed durations and renewal end-date arithmetic
/// - [`timestamp`]: normalization of incoming end dates to UTC instants
/// - [`preview`]: status and renewal over raw end dates, reporting fallbacks

pub mod preview;
pub mod renewal;
pub mod status;
pub mod timestamp;

use uuid::Uuid;

/// Lifecycle errors that callers are expected to degrade rather than reject
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// A membership end string matched no supported format
    #[error("Unparsable timestamp: {0:?}")]
    UnparsableTimestamp(String),

    /// A member points at a trainer that no longer exists for the owner
    #[error("Trainer {0} referenced by member no longer exists")]
    DanglingTrainerReference(Uuid),
}

pub use renewal::{renew, MembershipDuration};
pub use status::{classify_membership, listing_status, ListingStatus, MembershipStatus, StatusReport};
