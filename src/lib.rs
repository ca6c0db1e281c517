//! tabhost - host an application's top-level windows as tabs.
//!
//! Every secondary window the host application would open on its own is
//! captured, demoted to a child and embedded as a tab of one container
//! window. The host keeps driving its windows through the usual lifecycle
//! (show, hide, retitle, focus, close); those calls route through the
//! [`controller::TabHost`] instead of the window system.

pub mod config;
pub mod context;
pub mod controller;
pub mod demote;
pub mod headless;
pub mod host;
pub mod identity;
pub mod input;
pub mod mru;
pub mod platform;
pub mod scenario;
pub mod state;
pub mod tab_strip;
pub mod tracing;
pub mod types;

pub use context::AppContext;
pub use controller::TabHost;
