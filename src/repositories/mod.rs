pub mod library_repository;
pub mod selection_repository;
pub mod study_repository;
pub mod uid_counter;
pub mod write_lock;

pub use library_repository::LibraryRepository;
pub use selection_repository::*;
pub use study_repository::{StudyDefinition, StudyRepository, StudyVersionEntry};
pub use uid_counter::{format_uid, next_uid};
pub use write_lock::acquire_write_lock;
