//! Wire models for the Dataplane API.

pub mod acl;
pub mod frontend;
pub mod map_entry;
pub mod transaction;

pub use acl::{Acl, AclParent, ParentType};
pub use frontend::{Forwardfor, Frontend, HttpConnectionMode, MonitorFail, ProxyMode, StatsOptions, Toggle};
pub use map_entry::{MapEntry, MapEntryId};
pub use transaction::{Configuration, Transaction, TransactionStatus, Versioned};
