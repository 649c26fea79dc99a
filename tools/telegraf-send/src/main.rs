// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! telegraf-send CLI
//!
//! Build one Line Protocol measurement from the command line and write it to
//! a Telegraf `socket_listener`.
//!
//! # Usage
//!
//! ```bash
//! # Float and integer fields over UDP
//! telegraf-send cpu --field load=1.4 --field counter=1i
//!
//! # Tags, a string field, and TCP
//! telegraf-send --address tcp://127.0.0.1:8094 app --tag path=/api --field msg='"ok"'
//!
//! # Let Telegraf stamp arrival time
//! telegraf-send weather --field temp=22.7 --no-timestamp
//!
//! # Print the encoded line instead of sending it
//! telegraf-send cpu --field load=1.4 --dry-run
//!
//! # Using a configuration file (address, default tags, write timeout)
//! telegraf-send --config telegraf-line.toml cpu --field load=1.4
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use telegraf_line::{Client, ClientConfig, FieldValue, Measurement};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "telegraf-send")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send a Line Protocol measurement to Telegraf")]
struct Cli {
    /// Measurement name
    measurement: String,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Telegraf service address (udp://, tcp://, unix://, unixgram://)
    #[arg(short, long)]
    address: Option<String>,

    /// Tag as key=value (can repeat)
    #[arg(short, long = "tag", value_name = "KEY=VALUE")]
    tags: Vec<String>,

    /// Field as key=value (can repeat). Values: 42i integer, 42u unsigned,
    /// true/false boolean, "text" string, otherwise float or bare string
    #[arg(short, long = "field", value_name = "KEY=VALUE")]
    fields: Vec<String>,

    /// Omit the timestamp so Telegraf stamps arrival time
    #[arg(long, conflicts_with = "timestamp_ns")]
    no_timestamp: bool,

    /// Explicit timestamp in nanoseconds since the Unix epoch
    #[arg(long)]
    timestamp_ns: Option<i64>,

    /// Send the measurement this many times
    #[arg(long, default_value = "1")]
    count: usize,

    /// Print the encoded line to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Verbose mode (show transport logs)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("telegraf_send=debug,telegraf_line=trace")
    } else {
        EnvFilter::new("telegraf_send=info,telegraf_line=warn")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let config = load_config(&cli)?;
    let measurement = build_measurement(&cli)?;

    if cli.dry_run {
        let mut client =
            Client::new(Vec::<u8>::new()).with_default_tags(config.default_tags.clone());
        client.write(&measurement)?;
        print!("{}", String::from_utf8_lossy(&client.into_inner()));
        return Ok(());
    }

    tracing::info!(
        address = %config.address,
        measurement = %cli.measurement,
        count = cli.count,
        "Sending measurement"
    );

    let mut client = Client::from_config(&config)
        .with_context(|| format!("Failed to connect to {}", config.address))?;
    let batch = vec![measurement; cli.count];
    client
        .write_all(&batch)
        .context("Failed to write measurement")?;
    client.close().context("Failed to close connection")?;

    tracing::debug!(lines = cli.count, "Done");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(address) = &cli.address {
        config.address = address.clone();
    }
    config.validate()?;
    Ok(config)
}

fn build_measurement(cli: &Cli) -> Result<Measurement> {
    if cli.fields.is_empty() {
        bail!("At least one --field is required");
    }

    let mut builder = Measurement::builder(cli.measurement.as_str());
    for tag in &cli.tags {
        let (key, value) = split_pair(tag)?;
        builder = builder.tag(key, value);
    }
    for field in &cli.fields {
        let (key, value) = split_pair(field)?;
        builder = builder.field(key, parse_field_value(value));
    }
    if cli.no_timestamp {
        builder = builder.no_timestamp();
    } else if let Some(ns) = cli.timestamp_ns {
        builder = builder.timestamp_nanos(ns);
    }
    Ok(builder.build())
}

fn split_pair(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Expected KEY=VALUE, got '{}'", arg),
    }
}

/// Interpret a command-line field value using Line Protocol literal hints.
fn parse_field_value(raw: &str) -> FieldValue {
    if let Some(digits) = raw.strip_suffix('i') {
        if let Ok(v) = digits.parse::<i64>() {
            return FieldValue::Int(v);
        }
    }
    if let Some(digits) = raw.strip_suffix('u') {
        if let Ok(v) = digits.parse::<u64>() {
            return FieldValue::UInt(v);
        }
    }
    match raw {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        _ => {}
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return FieldValue::String(raw[1..raw.len() - 1].to_string());
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => FieldValue::Float64(v),
        _ => FieldValue::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_value_hints() {
        assert_eq!(parse_field_value("42i"), FieldValue::Int(42));
        assert_eq!(parse_field_value("-7i"), FieldValue::Int(-7));
        assert_eq!(parse_field_value("42u"), FieldValue::UInt(42));
        assert_eq!(parse_field_value("true"), FieldValue::Bool(true));
        assert_eq!(parse_field_value("false"), FieldValue::Bool(false));
        assert_eq!(parse_field_value("1.4"), FieldValue::Float64(1.4));
        assert_eq!(parse_field_value("3"), FieldValue::Float64(3.0));
        assert_eq!(parse_field_value("\"true\""), FieldValue::String("true".into()));
        assert_eq!(parse_field_value("hi"), FieldValue::String("hi".into()));
        assert_eq!(parse_field_value("pi"), FieldValue::String("pi".into()));
        assert_eq!(parse_field_value("inf"), FieldValue::String("inf".into()));
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(split_pair("a=b=c").unwrap(), ("a", "b=c"));
        assert_eq!(split_pair("a=").unwrap(), ("a", ""));
        assert!(split_pair("=b").is_err());
        assert!(split_pair("novalue").is_err());
    }

    #[test]
    fn test_build_measurement_from_args() {
        let cli = Cli::parse_from([
            "telegraf-send",
            "app",
            "--tag",
            "path=/api",
            "--field",
            "size=5042i",
            "--timestamp-ns",
            "1000",
        ]);
        let m = build_measurement(&cli).unwrap();
        assert_eq!(m.to_string(), "app,path=/api size=5042i 1000");
    }

    #[test]
    fn test_build_measurement_requires_field() {
        let cli = Cli::parse_from(["telegraf-send", "app", "--no-timestamp"]);
        assert!(build_measurement(&cli).is_err());
    }

    #[test]
    fn test_address_flag_overrides_default() {
        let cli = Cli::parse_from([
            "telegraf-send",
            "--address",
            "tcp://127.0.0.1:9000",
            "cpu",
            "--field",
            "v=1",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.address, "tcp://127.0.0.1:9000");
    }

    #[test]
    fn test_bad_address_flag_is_rejected() {
        let cli = Cli::parse_from(["telegraf-send", "--address", "nope", "cpu", "--field", "v=1"]);
        assert!(load_config(&cli).is_err());
    }
}
