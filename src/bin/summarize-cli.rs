extern crate log;

use anyhow::{anyhow, Context};
use biomedgps_summarizer::config::{ConfigOpt, SummarizerConfig};
use biomedgps_summarizer::init_logger;
use biomedgps_summarizer::model::trapi::Answer;
use biomedgps_summarizer::publication::DefaultPublicationResolver;
use biomedgps_summarizer::summarize;
use dotenv::dotenv;
use log::*;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    setting = structopt::clap::AppSettings::ColoredHelp,
    name = "A cli for the biomedgps-summarizer service.",
    author = "Jingcheng Yang <yjcyxky@163.com>"
)]
struct Opt {
    /// Activate debug mode
    #[structopt(name = "debug", long = "debug")]
    debug: bool,

    #[structopt(subcommand)]
    cmd: SubCommands,
}

#[derive(Debug, PartialEq, StructOpt)]
enum SubCommands {
    #[structopt(name = "summarize")]
    Summarize(SummarizeArguments),
}

/// Run the summarization core over a batch of agents' TRAPI answers to one
/// query and print the consolidated summary as pretty JSON.
#[derive(StructOpt, PartialEq, Debug)]
#[structopt(
    setting = structopt::clap::AppSettings::ColoredHelp,
    name = "biomedgps-summarizer - summarize",
    author = "Jingcheng Yang <yjcyxky@163.com>"
)]
pub struct SummarizeArguments {
    /// [Required] Path to a JSON file shaped `{qid, answers: [{agent,
    /// message}], max_hops}`. `max_hops` in the file overrides `--max-hops`
    /// when present.
    #[structopt(name = "input", short = "i", long = "input", parse(from_os_str))]
    input: PathBuf,

    #[structopt(flatten)]
    config: ConfigOpt,
}

#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    qid: String,
    answers: Vec<Answer>,
    #[serde(default)]
    max_hops: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let opt = Opt::from_args();

    let _ = if opt.debug {
        init_logger("summarize-cli", LevelFilter::Debug)
    } else {
        init_logger("summarize-cli", LevelFilter::Info)
    };

    match opt.cmd {
        SubCommands::Summarize(arguments) => {
            let config = SummarizerConfig::from_opt(arguments.config)
                .map_err(|e| anyhow!("invalid configuration: {}", e))?;

            let raw = fs::read_to_string(&arguments.input)
                .with_context(|| format!("couldn't read {:?}", arguments.input))?;

            let raw_value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("couldn't parse {:?} as JSON", arguments.input))?;
            biomedgps_summarizer::error::validate_request(&raw_value).map_err(|e| anyhow!("{}", e))?;

            let request: SummarizeRequest = serde_json::from_value(raw_value)
                .with_context(|| format!("couldn't parse {:?} as a summarize request", arguments.input))?;

            // A request-level max_hops overrides the CLI/env default.
            let max_hops = request.max_hops.unwrap_or(config.max_hops);
            let resolver = DefaultPublicationResolver;

            let summary = summarize(&request.qid, &request.answers, max_hops, &resolver)
                .map_err(|e| anyhow!("summarization failed: {}", e))?;
            let json = serde_json::to_string_pretty(&summary).context("couldn't serialize summary")?;
            println!("{}", json);
            Ok(())
        }
    }
}
