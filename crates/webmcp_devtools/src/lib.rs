//! webmcp-kit Devtools
//!
//! Interactive harness for tool contracts: a state machine over the host
//! adapter, schema-derived input forms, human-attached interaction
//! brokers, and a ratatui front end.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod broker;
pub mod config;
pub mod demo;
pub mod form;
pub mod harness;
pub mod input;
pub mod layout;
pub mod renderer;
pub mod ui;
pub mod view;

pub use broker::{ConsoleBroker, PendingInteraction, TerminalBroker};
pub use config::{ConfigError, DevtoolsConfig};
pub use demo::{DemoError, demo_tools, register_demo_tools};
pub use form::{Control, FormField, FormState};
pub use harness::{Harness, HarnessSnapshot, HarnessState, LastResult, Submission};
pub use input::{InputError, InputEvent, InputHandler, InputMode, KeyBinding};
pub use layout::Layout;
pub use renderer::{RenderConfig, RenderError, Renderer};
pub use ui::{TuiApp, TuiError};
