//! A terminal front end: pick a model from the catalog, then chat with it.

#[macro_use]
extern crate tracing;

mod config;
mod picker;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use pocket_chat_core::{APOLOGY_TEXT, Role, SessionBuilder};
use pocket_chat_hf_model::HfProvider;
use pocket_chat_model::ModelCatalog;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

use config::AppConfig;
use picker::pick_model;

type StdinLines = Lines<BufReader<Stdin>>;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!("loaded config: {config:?}");

    let mut stdin = BufReader::new(io::stdin()).lines();

    let model = match &config.model {
        Some(model) => model.clone(),
        None => {
            let Some(model) = prompt_model(&config.catalog, &mut stdin).await
            else {
                return;
            };
            model
        }
    };

    let (turn_tx, mut turn_rx) = mpsc::unbounded_channel();

    let provider = HfProvider::new(config.hf_config());
    let session = SessionBuilder::with_inference_provider(provider)
        .with_catalog(config.catalog.clone())
        .with_model(model)
        .on_turn(move |turn| {
            turn_tx.send(turn.clone()).ok();
        })
        .build();
    let session = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    println!(
        "Chatting with {}, press Ctrl-D to quit.\n",
        session.model().bold()
    );

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        session.set_pending_input(line);
        if session.submit_pending_input().is_err() {
            continue;
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("🤔 Thinking...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let turn = select! {
                turn = turn_rx.recv() => {
                    let Some(turn) = turn else {
                        break 'outer;
                    };
                    turn
                },
                _ = sleep => {
                    continue;
                }
            };
            // Our own input comes back first, it's already on screen.
            if turn.role() == Role::User {
                continue;
            }

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = progress_bar.take() {
                progress_bar.finish_and_clear();
            }

            if turn.text() == APOLOGY_TEXT {
                println!("{}⚠️  {}", BAR_CHAR.bright_red(), turn.text());
            } else {
                println!(
                    "{}🤖 {}",
                    BAR_CHAR.bright_cyan(),
                    turn.text().bright_white()
                );
            }
            println!();
            break;
        }
    }

    session.close();
}

async fn prompt_model(
    catalog: &ModelCatalog,
    stdin: &mut StdinLines,
) -> Option<String> {
    let Some(default_model) = catalog.default_model() else {
        eprintln!("the model catalog is empty");
        return None;
    };

    println!("{}", "Select a model".bold());
    for (idx, model) in catalog.iter().enumerate() {
        println!("  {}. {model}", idx + 1);
    }

    loop {
        print!("Model [{default_model}]: ");
        std::io::stdout().flush().ok();

        let answer = read_line(stdin).await?;
        match pick_model(catalog, &answer) {
            Some(model) => return Some(model.to_owned()),
            None => println!("`{}` is not in the list", answer.trim()),
        }
    }
}

async fn read_line(stdin: &mut StdinLines) -> Option<String> {
    match stdin.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
