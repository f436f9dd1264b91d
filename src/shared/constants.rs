/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Role claim value that grants access to the admin console
pub const ROLE_ADMIN: &str = "admin";

/// Carousel auto-advance interval in milliseconds
pub const CAROUSEL_INTERVAL_MS: u64 = 6000;

pub const DEFAULT_BUTTON_TEXT: &str = "Shop Now";

pub const DEFAULT_BANNER_LINK: &str = "#";
