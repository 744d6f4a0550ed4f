pub mod error;
#[cfg(test)]
pub mod memory;
pub mod profile_repo;

pub use error::RepoError;
pub use profile_repo::{
    Address, NewProfile, PgProfileRepo, ProfileChanges, ProfileRepo, ProfileRow, ProfileStatus,
};
