pub mod config;
pub mod item;
pub mod search;
pub mod source;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, ApiConfig, Config,
    ConfigError, LogFormat, LoggingConfig, OutputConfig, OutputFormat,
};
pub use item::{Item, ItemId, ItemKind, Story};
pub use search::{
    AgeProbe, RetryConfig, RetryPolicy, SearchConfig, SearchError, SearchPhase, SearchReport,
    SearchStats, StopReason, StorySearch,
};
pub use source::{FetchError, HackerNewsClient, ItemSource};
