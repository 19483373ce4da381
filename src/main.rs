mod app;
mod config;
mod error;
mod mpris;
mod player;
mod runtime;
mod scheduler;
mod station;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
