pub use super::image_history::Entity as ImageHistory;
pub use super::search_history::Entity as SearchHistory;
pub use super::users::Entity as Users;
