pub mod prelude;

pub mod image_history;
pub mod search_history;
pub mod users;
