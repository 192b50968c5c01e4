//! Call lifecycle: state, token retrieval, session seam and the controller
//! that ties them together.

pub mod controller;
pub mod session;
pub mod state;
pub mod token;

pub use controller::{CallController, ControllerEvent};
pub use session::{CallSession, SessionListener, SimulatedSession};
pub use state::{ButtonStyle, CallState};
pub use token::{HttpTokenSource, TokenSource};
