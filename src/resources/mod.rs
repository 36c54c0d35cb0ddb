//! Declarative resources: create, read, update, delete and import per object type.
//!
//! ACLs and frontends are structural and go through the transaction runner;
//! map entries are runtime state and call the gateway directly.

pub mod acl;
pub mod frontend;
pub mod map_entry;
