#![deny(unsafe_code)]
//! WASM bindings: mounts the textured quad on an HTML canvas.
//!
//! The page creates a `QuadComponent` for a canvas and calls
//! `onAfterRender(firstRender)` from its render lifecycle. The first call
//! creates a WebGL2 context and runs the setup; later calls do nothing.

pub mod fetch;
pub mod logger;

#[cfg(target_arch = "wasm32")]
mod component;

#[cfg(target_arch = "wasm32")]
pub use component::QuadComponent;
pub use fetch::BrowserFetcher;
