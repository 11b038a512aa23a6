//! Workspace integration tests.

mod helpers;

mod health_test;
mod realtime_test;
mod session_test;
mod socket_test;
mod ws_test;
