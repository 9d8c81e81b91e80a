// Library exports for tweetai-server
// The binary and the seed tool both build on these modules

pub mod api;
pub mod config;
pub mod db;
pub mod job;
pub mod placeholder;
pub mod rate_limit;
pub mod realtime;
pub mod routes;
pub mod scheduler;
pub mod state;
