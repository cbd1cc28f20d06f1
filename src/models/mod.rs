pub mod image;
pub mod search;
