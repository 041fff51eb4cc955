pub mod study_selection_service;
pub mod study_service;

pub use study_selection_service::*;
pub use study_service::*;
