use modulex_core::config::Config;
use modulex_core::dispatch::Dispatcher;
use modulex_core::frames::FrameStore;
use modulex_core::notifier::{HttpNotifier, Notifier};
use modulex_core::store::StateStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub frames: FrameStore,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(root: PathBuf, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            frames: FrameStore::new(root),
            dispatcher: Dispatcher::new(notifier),
        }
    }

    /// State wired to the signaling endpoint named in `config`.
    pub fn from_config(config: &Config) -> modulex_core::Result<Self> {
        let notifier = HttpNotifier::from_config(config)?;
        Ok(Self::new(config.storage_root.clone(), Arc::new(notifier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_uses_storage_root() {
        let config = Config {
            storage_root: PathBuf::from("/tmp/modulex-test"),
            ..Config::default()
        };
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.frames.root(), std::path::Path::new("/tmp/modulex-test"));
        assert_eq!(state.store.annotations_processed(), 0);
    }
}
