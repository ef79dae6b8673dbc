use super::parsers::{parse_bool_env, parse_duration, parse_duration_arg};
use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use crate::user::UserProfile;
use std::time::Duration;

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["albums-load"])?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (args.host == "http://localhost:8080", "Unexpected host"),
        (args.users.get() == 1, "Unexpected users"),
        (args.spawn_rate.get() == 1, "Unexpected spawn_rate"),
        (args.run_time == Duration::from_secs(60), "Unexpected run_time"),
        (args.requests.is_none(), "Expected requests to be None"),
        (
            matches!(args.profile, UserProfile::Standard),
            "Expected standard profile",
        ),
        (args.wait_min == Duration::from_secs(1), "Unexpected wait_min"),
        (args.wait_max == Duration::from_secs(2), "Unexpected wait_max"),
        (args.weight_list == 3, "Unexpected weight_list"),
        (args.weight_get == 3, "Unexpected weight_get"),
        (args.weight_create == 1, "Unexpected weight_create"),
        (args.album_ids == ["1", "2", "3"], "Unexpected album_ids"),
        (
            args.request_timeout == Duration::from_secs(10),
            "Unexpected request_timeout",
        ),
        (
            args.connect_timeout == Duration::from_secs(5),
            "Unexpected connect_timeout",
        ),
        (!args.disable_keepalive, "Expected keepalive enabled"),
        (args.seed.is_none(), "Expected seed to be None"),
        (args.config.is_none(), "Expected config to be None"),
        (args.export_json.is_none(), "Expected export_json to be None"),
        (!args.verbose, "Expected verbose to be false"),
        (!args.quiet, "Expected quiet to be false"),
        (args.no_color == expected_no_color, "Unexpected no_color"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_swarm_options() -> AppResult<()> {
    let args = parse_test_args([
        "albums-load",
        "-H",
        "http://127.0.0.1:9000",
        "-u",
        "50",
        "-r",
        "5",
        "-t",
        "2m",
        "--requests",
        "1000",
        "--profile",
        "SIMPLE",
        "--wait-min",
        "0",
        "--wait-max",
        "250ms",
        "--album-ids",
        "1,2,3,4",
        "--seed",
        "17",
    ])?;
    let checks = [
        (args.host == "http://127.0.0.1:9000", "Unexpected host"),
        (args.users.get() == 50, "Unexpected users"),
        (args.spawn_rate.get() == 5, "Unexpected spawn_rate"),
        (args.run_time == Duration::from_secs(120), "Unexpected run_time"),
        (
            args.requests.map(PositiveU64::get) == Some(1000),
            "Unexpected requests",
        ),
        (
            matches!(args.profile, UserProfile::Simple),
            "Expected simple profile",
        ),
        (args.wait_min == Duration::ZERO, "Unexpected wait_min"),
        (
            args.wait_max == Duration::from_millis(250),
            "Unexpected wait_max",
        ),
        (args.album_ids.len() == 4, "Unexpected album_ids"),
        (args.seed == Some(17), "Unexpected seed"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_users() -> AppResult<()> {
    if parse_test_args(["albums-load", "--users", "0"]).is_ok() {
        return Err(AppError::validation("Expected zero users to be rejected"));
    }
    if parse_test_args(["albums-load", "--duration", "0s"]).is_ok() {
        return Err(AppError::validation("Expected zero duration to be rejected"));
    }
    Ok(())
}

#[test]
fn duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "{} parsed as {:?}",
                input, parsed
            )));
        }
    }
    if !matches!(
        parse_duration("5d", false),
        Err(ValidationError::InvalidDurationUnit { .. })
    ) {
        return Err(AppError::validation("Expected invalid unit"));
    }
    if !matches!(parse_duration("", false), Err(ValidationError::DurationEmpty)) {
        return Err(AppError::validation("Expected empty duration error"));
    }
    if parse_duration("0", true)? != Duration::ZERO {
        return Err(AppError::validation("Expected zero wait to be accepted"));
    }
    Ok(())
}

#[test]
fn bool_env_values() -> AppResult<()> {
    for value in ["1", "true", "YES", "on"] {
        if !parse_bool_env(value)? {
            return Err(AppError::validation(format!("{} should be true", value)));
        }
    }
    for value in ["0", "false", "No", "off"] {
        if parse_bool_env(value)? {
            return Err(AppError::validation(format!("{} should be false", value)));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err(AppError::validation("Expected invalid boolean"));
    }
    Ok(())
}
