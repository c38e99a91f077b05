pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ConfigError, ServiceError, StoreError, SurfaceError, TabkeepError};
pub use events::{Event, EventBus};
pub use id::{new_id, SurfaceId, TabId};

pub type Result<T> = std::result::Result<T, TabkeepError>;
