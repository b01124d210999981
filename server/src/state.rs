use std::sync::Arc;

use crate::{
    blogs::BlogAdmin,
    config::Config,
    dashboard::Dashboard,
    store::{ChangeHub, Store},
};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub dashboard: Dashboard,
    pub blog_admin: BlogAdmin,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let hub = Arc::new(ChangeHub::new());
        let store = Store::new(&config.store_url, &config.store_key, hub);

        Arc::new(Self {
            config,
            store,
            dashboard: Dashboard::new(),
            blog_admin: BlogAdmin::new(),
        })
    }

    /// Build with a pre-configured client, e.g. one pointed at a fake
    /// backend.
    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            dashboard: Dashboard::new(),
            blog_admin: BlogAdmin::new(),
        })
    }
}
