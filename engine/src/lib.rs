pub mod backend;
pub mod cache;
pub mod context;
pub mod error;
pub mod session;
pub mod weaver;

pub use backend::{Backend, Language, LanguageSet};
pub use cache::{CacheKey, RunCache};
pub use context::{FeedOptions, SourceSet};
pub use error::{EngineError, ExecError, UsageError};
pub use weaver::Weaver;
