use std::sync::Arc;

use log::Logger;

use crate::clock::Today;
use crate::store::Store;
use crate::urls::Urls;

/// Default number of days ahead that count as "upcoming".
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 30;

/// Everything a handler needs, cheap to clone into each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: Arc<dyn Store>,
    pub urls: Arc<Urls>,
    pub today: Arc<Today>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        store: Arc<dyn Store>,
        urls: Arc<Urls>,
        today: Arc<Today>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            store,
            urls,
            today,
            config,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) upcoming_window_days: u32,
}

impl Config {
    pub fn new(upcoming_window_days: u32) -> Self {
        Self {
            upcoming_window_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_UPCOMING_WINDOW_DAYS)
    }
}
