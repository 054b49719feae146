pub mod bookmark;
pub mod star;
