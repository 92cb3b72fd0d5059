//! Configuration (spec §6): the three settings the core recognizes —
//! `max_hops`, `id_patterns`, and `ara_to_infores_map` — loaded from CLI
//! flags with environment-variable fallback, `dotenv`-style, the way
//! `biomedgps-cli` reads its own `database_url`/`neo4j_url` options.

use crate::error::SummarizeError;
use log::warn;
use regex::Regex;
use std::collections::HashMap;
use structopt::StructOpt;
use validator::Validate;

/// CLI surface for `summarize-cli`: one `--max-hops`, repeatable
/// `--id-pattern` and `--ara-infores key=value` flags, each falling back to
/// an environment variable when unset on the command line.
#[derive(StructOpt, Debug)]
#[structopt(
    setting = structopt::clap::AppSettings::ColoredHelp,
    name = "summarize-cli",
    author = "Jingcheng Yang <yjcyxky@163.com>"
)]
pub struct ConfigOpt {
    /// [Optional] Upper bound on path length: paths are capped at
    /// 2*max_hops+1 elements. Falls back to the MAX_HOPS environment
    /// variable, defaulting to 3.
    #[structopt(long = "max-hops", env = "MAX_HOPS", default_value = "3")]
    pub max_hops: i64,

    /// [Optional] Ordered regexes the evidence expander uses to classify
    /// evidence ids; not consulted by the core itself. Repeatable.
    #[structopt(long = "id-pattern")]
    pub id_patterns: Vec<String>,

    /// [Optional] `infores_id=agent` pairs consumed by the HTTP layer, not
    /// by the core. Repeatable.
    #[structopt(long = "ara-infores")]
    pub ara_infores: Vec<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SummarizerConfig {
    #[validate(range(min = 1))]
    pub max_hops: i64,
    pub id_patterns: Vec<Regex>,
    pub ara_to_infores_map: HashMap<String, String>,
}

impl SummarizerConfig {
    /// Build and validate a config from parsed CLI/env options. An
    /// `--ara-infores` entry or `--id-pattern` that fails to parse/compile is
    /// logged and dropped, per the crate's recover-and-continue policy —
    /// only `max_hops` is a programmer-contract violation.
    pub fn from_opt(opt: ConfigOpt) -> Result<Self, SummarizeError> {
        if opt.max_hops < 1 {
            return Err(SummarizeError::InvalidMaxHops { max_hops: opt.max_hops });
        }

        let id_patterns = opt
            .id_patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("dropping invalid id_pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect();

        let mut ara_to_infores_map = HashMap::new();
        for pair in &opt.ara_infores {
            match pair.split_once('=') {
                Some((k, v)) => {
                    ara_to_infores_map.insert(k.to_string(), v.to_string());
                }
                None => warn!("dropping malformed --ara-infores entry {:?}, expected key=value", pair),
            }
        }

        let config = SummarizerConfig { max_hops: opt.max_hops, id_patterns, ara_to_infores_map };
        config.validate().map_err(|_| SummarizeError::InvalidMaxHops { max_hops: config.max_hops })?;
        Ok(config)
    }
}
