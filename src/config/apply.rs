use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Options given on the
/// command line win.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "host")
        && let Some(host) = config.host.clone()
    {
        args.host = host;
    }

    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = ensure_positive_usize(users, "users")?;
    }

    if !is_cli(matches, "spawn_rate")
        && let Some(spawn_rate) = config.spawn_rate
    {
        args.spawn_rate = ensure_positive_usize(spawn_rate, "spawn_rate")?;
    }

    if !is_cli(matches, "run_time")
        && let Some(duration) = config.duration.as_ref()
    {
        args.run_time = config_duration(duration, "duration", false)?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = Some(ensure_positive_u64(requests, "requests")?);
    }

    if !is_cli(matches, "profile")
        && let Some(profile) = config.profile
    {
        args.profile = profile;
    }

    if let Some(wait) = config.wait.as_ref() {
        if !is_cli(matches, "wait_min")
            && let Some(min) = wait.min.as_ref()
        {
            args.wait_min = config_duration(min, "wait.min", true)?;
        }
        if !is_cli(matches, "wait_max")
            && let Some(max) = wait.max.as_ref()
        {
            args.wait_max = config_duration(max, "wait.max", true)?;
        }
    }

    if let Some(tasks) = config.tasks.as_ref() {
        if !is_cli(matches, "weight_list")
            && let Some(weight) = tasks.list_albums
        {
            args.weight_list = weight;
        }
        if !is_cli(matches, "weight_get")
            && let Some(weight) = tasks.get_album
        {
            args.weight_get = weight;
        }
        if !is_cli(matches, "weight_create")
            && let Some(weight) = tasks.create_album
        {
            args.weight_create = weight;
        }
    }

    if !is_cli(matches, "album_ids")
        && let Some(ids) = config.album_ids.clone()
    {
        args.album_ids = ids;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = config_duration(timeout, "timeout", false)?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = config_duration(timeout, "connect_timeout", false)?;
    }

    if !is_cli(matches, "disable_keepalive")
        && let Some(disable) = config.disable_keepalive
    {
        args.disable_keepalive = disable;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_cli(matches, "quiet")
        && let Some(quiet) = config.quiet
    {
        args.quiet = quiet;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn config_duration(value: &DurationValue, field: &str, allow_zero: bool) -> AppResult<Duration> {
    value.to_duration(allow_zero).map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}
