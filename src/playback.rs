//! Time-driven frame selection and the cooperative preview loop.

pub mod preview_loop;
pub mod scheduler;
pub mod state;
