pub mod catalog;
pub mod dict;
pub mod router;
pub mod schema;
pub mod table;
pub(crate) mod value;
