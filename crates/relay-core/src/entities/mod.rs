//! Entity structs for Relay domain objects.

mod canonical;
mod cursor;

pub use canonical::{
    ATTR_EVENT_META_V1, ATTR_EVENT_SCHEDULE_V1, ATTR_INVITE_META_V1, CanonicalEntity,
    EventMetaV1, EventScheduleV1, InviteMetaV1,
};
pub use cursor::SyncCursor;
