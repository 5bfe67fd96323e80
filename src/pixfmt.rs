pub mod catalog;
pub mod descriptor;
pub mod layout;
pub mod stride;
