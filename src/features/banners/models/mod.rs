mod banner;

pub use banner::{Banner, BannerFields, BannerFilter};
