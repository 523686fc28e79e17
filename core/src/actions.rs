//! Action segment names shared by services and their clients.

pub const ARCHIVE: &str = "Archive";
pub const CHECK_THE_ITEM_FOR_ARCHIVING: &str = "CheckTheItemForArchiving";
pub const RESTORE: &str = "Restore";
