mod error;
mod input;
mod path;
mod config;
mod formatting;
mod browser;
mod preview;
mod profile;
mod state;
mod cli;

fn main() {
    use tracing_subscriber::{FmtSubscriber, EnvFilter};

    if let Err(err) = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("failed to initialize global tracing subscriber: {err}");
    }

    if let Err(err) = cli::start() {
        println!("{}", err);

        std::process::exit(1);
    }
}
