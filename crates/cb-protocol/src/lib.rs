pub mod bot;
pub mod intent;
pub mod interaction;
pub mod user;

pub use bot::*;
pub use intent::*;
pub use interaction::*;
pub use user::*;
