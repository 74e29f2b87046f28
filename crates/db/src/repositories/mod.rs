mod creation_repo;

pub use creation_repo::CreationRepo;
