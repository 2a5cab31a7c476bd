//! Modeling and analysis operations on shapes in a [`TopologyStore`].
//!
//! Every operation is a small struct configured through its `new`
//! constructor and builder-style `with_*` methods, then run with
//! `execute`.
//!
//! [`TopologyStore`]: crate::topology::TopologyStore

pub mod boolean;
pub mod creation;
pub mod query;
