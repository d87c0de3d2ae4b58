// driver/ - Everything between the field and the browser
//
// Timing, debouncing, loop lifecycle and viewport arithmetic are plain Rust
// so they can be tested natively. `web` wires them to the DOM and only
// builds for wasm.

mod clock;
mod debounce;
mod lifecycle;
mod viewport;

#[cfg(target_arch = "wasm32")]
mod web;

pub use clock::FrameClock;
pub use debounce::Debounce;
pub use lifecycle::{Launch, Lifecycle, LoopState};
pub use viewport::Viewport;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasRenderer, PetalBackground};
