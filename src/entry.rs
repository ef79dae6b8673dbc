use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::info;

use crate::app;
use crate::args::TesterArgs;
use crate::error::{AppResult, ValidationError};
use crate::user::{AlbumIds, TaskWeights, UserBehavior, WaitTime};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    apply_config(&mut args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let behavior = build_behavior(&args)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, behavior))
}

fn parse_args() -> AppResult<(TesterArgs, ArgMatches)> {
    let matches = TesterArgs::command().get_matches();
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn apply_config(args: &mut TesterArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

/// Turns the resolved options into the behavior every user runs.
pub(crate) fn build_behavior(args: &TesterArgs) -> Result<UserBehavior, ValidationError> {
    let weights = TaskWeights {
        list_albums: args.weight_list,
        get_album: args.weight_get,
        create_album: args.weight_create,
    };
    let wait = WaitTime::between(args.wait_min, args.wait_max)?;
    let album_ids = AlbumIds::new(args.album_ids.clone())?;
    UserBehavior::new(args.profile, &weights, wait, album_ids)
}

async fn run_async(args: TesterArgs, behavior: UserBehavior) -> AppResult<()> {
    let outcome = app::run_local(&args, behavior).await?;
    info!(
        requests = outcome.report.total.requests,
        failures = outcome.report.total.failures,
        "Run finished"
    );

    if !outcome.runtime_errors.is_empty() {
        app::print_runtime_errors(&outcome.runtime_errors);
        return Err(ValidationError::RuntimeErrors.into());
    }
    Ok(())
}
