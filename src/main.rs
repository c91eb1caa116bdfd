use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use skycheck_ui::{render_state, AppServices, PipelineState, WeatherCommand, WeatherServiceMessage};

const PROMPT: &str = "Enter location (e.g., city name, zip code), or 'quit' to exit:";

fn main() -> Result<()> {
    skycheck_core::init()?;

    let mut app = skycheck_core::App::new()?;
    app.initialize()?;

    let services = AppServices::new(&app.config().weather)?;
    tracing::info!("Skycheck started");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let succeeded = if args.is_empty() {
        interactive(services)?;
        true
    } else {
        let ok = one_shot(&services, args.join(" "));
        services.shutdown();
        ok
    };

    app.shutdown()?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

/// Look up a single location, printing every state until the run ends.
fn one_shot(services: &AppServices, query: String) -> bool {
    let run = services.dispatch(WeatherCommand::Submit(query));

    loop {
        match services.recv_weather_message_timeout(Duration::from_millis(250)) {
            Some(WeatherServiceMessage::StateChanged(state)) => {
                println!("{}", render_state(&state));
                if state.is_terminal() {
                    return matches!(state, PipelineState::Success(_));
                }
            }
            None if run.is_finished() => {
                tracing::error!("Lookup ended without a result");
                return false;
            }
            None => {}
        }
    }
}

/// Read locations from stdin until EOF or `quit`. Each line starts a new
/// lookup; results are printed by a renderer thread as they arrive.
fn interactive(services: AppServices) -> Result<()> {
    let updates = services
        .take_weather_receiver()
        .context("Weather updates already taken")?;
    let renderer = std::thread::spawn(move || {
        for WeatherServiceMessage::StateChanged(state) in updates {
            let text = render_state(&state);
            if !text.is_empty() {
                println!("{}\n", text);
            }
        }
    });

    println!("{}", PROMPT);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut runs = Vec::new();
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim() == "quit" {
            break;
        }
        runs.retain(|run: &tokio::task::JoinHandle<()>| !run.is_finished());
        runs.push(services.dispatch(WeatherCommand::Submit(line)));
    }

    // Let lookups submitted right before EOF print their result
    let runtime = services.runtime();
    for run in runs {
        if let Err(e) = runtime.block_on(run) {
            tracing::error!("Lookup task failed: {}", e);
        }
    }

    // Dropping the runtime drops the model, which closes the renderer's channel
    services.shutdown();
    if renderer.join().is_err() {
        tracing::error!("Renderer thread panicked");
    }
    Ok(())
}
