mod movie;
mod user;

pub use movie::{Movie, MovieFilter, NewMovie};
pub use user::User;
