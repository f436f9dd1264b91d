pub mod banner_dto;

pub use banner_dto::{BannerQueryParams, BannerRequestDto, BannerResponseDto};
