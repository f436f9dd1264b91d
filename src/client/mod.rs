//! Consumers of the banner API: the admin console's authoring form and the
//! storefront carousel.

mod api;
mod banner_form;
mod carousel;
mod config;
mod error;
mod session;
mod upload_ledger;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{BannerApi, HttpBannerApi};
pub use banner_form::{
    BannerDraft, BannerForm, DraftField, FormMode, FormState, ImageSource, Navigation,
    BANNER_LIST_ROUTE,
};
pub use carousel::{Carousel, CarouselState, CarouselView, Slide};
pub use config::ClientConfig;
pub use error::{ClientError, FieldErrors};
pub use session::AdminSession;
pub use upload_ledger::{PendingUpload, UploadLedger};
