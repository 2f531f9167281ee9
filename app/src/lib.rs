//! Health-record companion app: UI runtime and host-side glue.
//!
//! The crate is split the same way the binary uses it: `ui` owns the pure
//! navigation state machine and produces renderable frames, while `backend`,
//! `wallet`, `qr`, and `time` cover the side-effectful seams. `system` wires
//! the two halves together by executing the effects the UI requests.

pub mod backend;
pub mod qr;
pub mod system;
pub mod time;
pub mod ui;
pub mod wallet;
