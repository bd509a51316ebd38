//! Terminal display system
//!
//! Separates user-facing output (status lines, tables, spinners) from
//! diagnostics, which go through tracing. Commands only ever talk to the
//! [`DisplayProvider`] trait.

pub mod live;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod providers;
pub mod render;
pub mod structured;
pub mod styling;

pub use live::LiveDisplayProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{
    DisplayProvider, DisplayProviderExt, ProgressProvider, ProgressTracker, StatusProvider,
    StructuredProvider,
};
pub use styling::StyleManager;
