use crate::commands::TurnOptions;
use crate::context::config::{load_profile, load_settings};
use crate::context::engine;
use crate::context::paths::resolve_paths;
use crate::openai::client::OpenAiClient;
use anyhow::Result;
use std::io::{self, BufRead, Write};

pub fn run(opts: &TurnOptions) -> Result<()> {
    let paths = resolve_paths()?;
    let settings = load_settings(&paths)?;
    let profile = load_profile(&paths, &opts.profile)?;
    let client = OpenAiClient::from_env(&settings)?;
    let refs = opts.file_references();

    println!(
        "[interactive] profile `{}`; type `exit` or `quit` to leave",
        opts.profile
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("you: ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit") {
            break;
        }

        // a failed turn aborts only itself; the loop stays alive
        match engine::run_turn(&client, &paths, &settings, &profile, prompt, &refs) {
            Ok(outcome) => println!("assistant: {}\n", outcome.response),
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    Ok(())
}
