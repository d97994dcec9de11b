pub mod assignment;
pub mod authz;
pub mod error;
pub mod roster;
pub mod session;
