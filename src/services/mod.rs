pub mod auth_service;
pub mod currency_service;
pub mod gemini_service;
pub mod guide_service;
pub mod normalizer_service;
pub mod preference_service;

pub use currency_service::*;
pub use guide_service::*;
pub use normalizer_service::*;
pub use preference_service::*;
