use crate::commands::TurnOptions;
use crate::context::config::{load_profile, load_settings};
use crate::context::engine;
use crate::context::paths::resolve_paths;
use crate::openai::client::OpenAiClient;
use anyhow::Result;

pub fn run(opts: &TurnOptions, question: &str) -> Result<()> {
    let paths = resolve_paths()?;
    let settings = load_settings(&paths)?;
    let profile = load_profile(&paths, &opts.profile)?;
    let client = OpenAiClient::from_env(&settings)?;

    let outcome = engine::run_turn(
        &client,
        &paths,
        &settings,
        &profile,
        question,
        &opts.file_references(),
    )?;

    println!("{}", outcome.response);
    Ok(())
}
