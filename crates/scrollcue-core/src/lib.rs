pub mod config;
pub mod diagnostics;
pub mod effects;
pub mod error;
pub mod gesture;
pub mod script;
pub mod scroll;
pub mod session;
pub mod timer;

pub use config::{AppConfig, ContainerConfig, GestureConfig, ScrollConfig, ScrollMethod, TimingConfig};
pub use error::{Error, Result};
pub use gesture::{Point, SafeArea};
pub use script::{Script, ScriptId};
pub use scroll::CalculationResult;
pub use session::{Session, SessionEvent};
