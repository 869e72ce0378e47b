pub use super::favorites::Entity as Favorites;
pub use super::movies::Entity as Movies;
pub use super::users::Entity as Users;
