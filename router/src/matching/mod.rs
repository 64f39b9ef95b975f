mod matcher;
mod path_segment;
pub use matcher::*;
pub use path_segment::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static ROUTE_ID: AtomicUsize = AtomicUsize::new(1);

/// Identifies a declared route for as long as it exists.
///
/// Two matches with the same ID come from the same route, so whatever it
/// rendered can stay mounted and only needs its params updated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RouteMatchId(pub(crate) usize);

impl RouteMatchId {
    /// Creates a new, unique match ID.
    pub fn new_from_route_id() -> RouteMatchId {
        RouteMatchId(ROUTE_ID.fetch_add(1, Ordering::Relaxed))
    }
}
