mod banner_repository;
#[cfg(test)]
mod memory;

pub use banner_repository::{BannerRepository, PgBannerRepository};
#[cfg(test)]
pub use memory::InMemoryBannerRepository;
