//! Storefront banner carousel.
//!
//! [`CarouselState`] is the pure cursor logic; [`Carousel`] mounts it on a
//! tokio task that fetches the public list once and rotates on a timer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error};

use super::api::BannerApi;
use crate::features::banners::dtos::BannerResponseDto;
use crate::shared::constants::{CAROUSEL_INTERVAL_MS, DEFAULT_BANNER_LINK, DEFAULT_BUTTON_TEXT};

/// One rendered slide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub index: usize,
    pub badge: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    /// Bullet points under the description, possibly empty
    pub features: Vec<String>,
    pub image: String,
    pub button_text: String,
    pub link: String,
    /// One entry per banner, `true` for the current one
    pub indicators: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselView {
    /// Nothing to show yet (or nothing to show at all)
    Loading,
    Slide(Slide),
}

#[derive(Debug, Clone, Default)]
pub struct CarouselState {
    banners: Vec<BannerResponseDto>,
    current: usize,
}

impl CarouselState {
    pub fn new(banners: Vec<BannerResponseDto>) -> Self {
        Self {
            banners,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.current = (self.current + 1) % self.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.is_empty() {
            self.current = (self.current + self.len() - 1) % self.len();
        }
    }

    /// Jump to `index`; out-of-range indexes are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn view(&self) -> CarouselView {
        let Some(banner) = self.banners.get(self.current) else {
            return CarouselView::Loading;
        };

        CarouselView::Slide(Slide {
            index: self.current,
            badge: banner.badge.clone(),
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone(),
            description: banner.description.clone(),
            features: banner.features.clone(),
            image: banner.image.clone(),
            button_text: banner
                .button_text
                .clone()
                .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
            link: banner
                .link
                .clone()
                .unwrap_or_else(|| DEFAULT_BANNER_LINK.to_string()),
            indicators: (0..self.len()).map(|i| i == self.current).collect(),
        })
    }
}

type SharedState = Arc<Mutex<CarouselState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, CarouselState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A mounted carousel; dropping it stops the rotation timer
pub struct Carousel {
    state: SharedState,
    task: JoinHandle<()>,
}

impl Carousel {
    pub fn mount(api: Arc<dyn BannerApi>) -> Self {
        Self::mount_with_interval(api, Duration::from_millis(CAROUSEL_INTERVAL_MS))
    }

    pub fn mount_with_interval(api: Arc<dyn BannerApi>, period: Duration) -> Self {
        let state = SharedState::default();
        let task = tokio::spawn(rotate(api, Arc::clone(&state), period));
        Self { state, task }
    }

    pub fn view(&self) -> CarouselView {
        lock(&self.state).view()
    }

    pub fn current(&self) -> usize {
        lock(&self.state).current()
    }

    /// Manual navigation leaves the timer phase alone
    pub fn next(&self) {
        lock(&self.state).advance();
    }

    pub fn previous(&self) {
        lock(&self.state).previous();
    }

    pub fn select(&self, index: usize) -> bool {
        lock(&self.state).select(index)
    }

    /// Whether the fetch or rotation task is still alive
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn unmount(self) {}
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn rotate(api: Arc<dyn BannerApi>, state: SharedState, period: Duration) {
    let banners = match api.list_public_banners().await {
        Ok(banners) => banners,
        Err(e) => {
            error!("Failed to load banners: {}", e);
            return;
        }
    };

    if banners.is_empty() {
        debug!("No banners to show");
        return;
    }

    *lock(&state) = CarouselState::new(banners);

    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        lock(&state).advance();
    }
}
