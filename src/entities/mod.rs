pub mod prelude;

pub mod favorites;
pub mod movies;
pub mod users;
