mod app;
mod backend;
mod config;
mod error;
mod library;
mod player;
mod playlist;
mod runtime;
mod tasks;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
