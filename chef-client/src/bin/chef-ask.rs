use std::io::{self, BufRead, Write};

use anyhow::Result;
use chef_client::{Command, RecipeClient, Walkthrough};
use clap::Parser;

/// Ask the chef server for a recipe and walk through it step by step
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The dish to cook
    dish: String,
    /// URL of the server to ask
    #[arg(long, default_value = "http://localhost:8000")]
    server: String,
    /// Print every step and exit instead of walking through them
    #[arg(short, long)]
    list: bool,
    /// Print the raw JSON reply and exit
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let client = RecipeClient::new(&args.server);
    let mut walkthrough = match client.get_steps(&args.dish).await {
        Ok(response) if args.json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        Ok(response) => Walkthrough::from_response(response),
        Err(e) => {
            tracing::error!("Error fetching recipe: {:#}", e);
            Walkthrough::fetch_failed()
        }
    };

    if args.list {
        for (i, step) in walkthrough.steps().iter().enumerate() {
            println!("Step {}: {}", i + 1, step);
        }
        return Ok(());
    }

    let Some(first) = walkthrough.current() else {
        println!("The recipe came back empty.");
        return Ok(());
    };
    println!("Step 1: {first}");
    println!("Type 'next', 'repeat' or 'start over' ('quit' to leave)");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        let command = Command::parse(&line);
        let reply = walkthrough.apply(command).map(str::to_owned);
        if let Some(text) = reply {
            if command == Command::Unknown {
                println!("{text}");
            } else {
                println!("Step {}: {}", walkthrough.position(), text);
            }
        }
    }
    Ok(())
}
