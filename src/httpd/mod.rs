pub mod client;
pub mod info;
pub mod status;
pub mod version;

pub use client::{info_url, response_check_url, status_url, HttpResponse, HttpdClient};
pub use status::{Scoreboard, StatusPage, WorkerState};
