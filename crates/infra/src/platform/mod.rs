//! Platform adapters
//!
//! OS-facing implementations of the core process and picker ports. Platform
//! differences are handled with `cfg` branches inside each adapter.

pub mod inspector;
pub mod launcher;
pub mod picker;

pub use inspector::SysinfoProcessInspector;
pub use launcher::DefaultHandlerLauncher;
pub use picker::PromptFilePicker;
