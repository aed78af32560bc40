pub mod guide;
pub mod preference;
pub mod user;

pub use guide::*;
pub use preference::*;
pub use user::*;
