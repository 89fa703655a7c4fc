//! Subscriber dispatch.
//!
//! Dispatch operates on a snapshot of a subscriber list cloned out of the
//! tree by the triggering call, so registry mutations made by an in-flight
//! callback never affect the current delivery. Within one list, callbacks run
//! in insertion order; the first `Err` aborts delivery to the remaining
//! subscribers and propagates to the caller of the trigger. Subscriber
//! failures are deliberately not isolated or swallowed.

use crate::subscription::{Args, SubscriberList};
use crate::EventError;

/// Invokes every subscriber in the snapshot with the same argument vector.
pub(crate) fn dispatch(list: &SubscriberList, args: &Args) -> Result<(), EventError> {
    for subscription in list {
        (subscription.callback)(args)?;
    }
    Ok(())
}
