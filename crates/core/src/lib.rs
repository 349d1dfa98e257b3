//! Shop client core: persisted session, storage and display helpers

pub mod error;
pub mod format;
pub mod navigation;
pub mod session;
pub mod storage;

pub use error::{CoreError, CoreResult};
pub use navigation::{LOGIN_PATH, LogNavigator, Navigator, RecordingNavigator};
pub use session::{Role, Session, SessionContext, SessionStore, StorageKeys};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use navigation::LocationNavigator;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
