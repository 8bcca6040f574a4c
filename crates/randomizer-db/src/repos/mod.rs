//! Repositories

pub mod item;
pub mod user;

pub use item::ItemRepo;
pub use user::UserRepo;
