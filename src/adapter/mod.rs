//! Key-value front-end adapter
//!
//! Maps a leveled, hierarchical key-value logging API onto a
//! severity-leveled [`Backend`](crate::core::Backend).

pub mod attr;
pub mod caller;
pub mod encoder;
pub mod facade;
pub mod name;
pub mod value;
pub mod verbosity;

pub use attr::{Attr, AttrValue, LogValuer, MAX_RESOLVE_STEPS};
pub use caller::{CallerInfo, CALLER_KEY};
pub use facade::{KvLogger, KvLoggerBuilder};
pub use name::{LoggerName, NAME_KEY};
pub use value::{FormatFn, Loggable, Marshaler, Value};
pub use verbosity::INFO_SEVERITY;
