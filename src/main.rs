use std::io::stdin;

use clap::Parser;
use ui::repl;

use crate::service::data_manager::DataManager;

mod model;
mod pricing;
mod service;
mod ui;

/// Terminal client for the Riftboost elo boosting marketplace
#[derive(Parser, Debug)]
#[command(name = "riftboost")]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the marketplace API base URL (otherwise RIFTBOOST_API_URL
    /// or the local default is used)
    #[arg(short = 'a', long = "api-url")]
    api_url: Option<String>,
}

fn main() {
    let args = Args::parse();
    if let Some(api_url) = args.api_url {
        std::env::set_var("RIFTBOOST_API_URL", api_url);
    }

    match DataManager::new() {
        Ok(manager) => match repl::run(manager) {
            Ok(_) => return,
            Err(error) => println!("Error occured while running REPL:\n{}\n", error),
        },
        Err(error) => println!("Error occured while initializing:\n{}\n", error),
    };

    let mut s = String::new();
    println!("Press Enter to exit");
    let _ = stdin().read_line(&mut s);
}
