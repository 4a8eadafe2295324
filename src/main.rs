//! # Fourwings Decoder CLI
//!
//! Inspection tool for packed activity-tile payloads: reads a payload file
//! plus its framing metadata from the command line, decodes it through the
//! library, and prints either a population summary or the full result as
//! JSON. Useful for eyeballing tiles saved off a tile service and for
//! debugging encoder output without a rendering stack.
//!
//! ```text
//! fourwings-decoder tile.bin --lengths 1024,2048,3072 --min-frame 1672531200000 \
//!     --max-frame 1675209600000 --interval DAY --cols 113 --rows 53 --json
//! ```

use anyhow::{bail, Context, Result};
use fourwings_lib::config::FormatConfig;
use fourwings_lib::interval::Interval;
use fourwings_lib::tile::{decode_tile, TileOptions};
use fourwings_lib::TileData;
use std::env;
use std::fs;

fn usage() -> &'static str {
    "usage: fourwings-decoder <payload-file> --lengths N,N,... --min-frame MS --max-frame MS\n\
     \n\
     options:\n\
       --lengths N,N,...   cumulative end-byte offsets, one per sublayer (required)\n\
       --min-frame MS      window start, epoch milliseconds (required)\n\
       --max-frame MS      window end, epoch milliseconds (required)\n\
       --interval KIND     HOUR | DAY | 10DAYS | MONTH (default DAY)\n\
       --sublayers N       channels per cell (default: number of segments)\n\
       --cols N --rows N   grid dimensions passed through to the output\n\
       --config PATH       TOML file with no_data_value/scale/offset overrides\n\
       --json              print the full decoded tile as JSON"
}

#[derive(Debug)]
struct CliArgs {
    payload_path: String,
    lengths: Vec<usize>,
    min_frame: i64,
    max_frame: i64,
    interval: Interval,
    sublayers: Option<usize>,
    cols: u32,
    rows: u32,
    config_path: Option<String>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut payload_path = None;
    let mut lengths = Vec::new();
    let mut min_frame = None;
    let mut max_frame = None;
    let mut interval = Interval::Day;
    let mut sublayers = None;
    let mut cols = 0;
    let mut rows = 0;
    let mut config_path = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--lengths" => {
                let value = iter.next().context("--lengths needs a value")?;
                lengths = value
                    .split(',')
                    .map(|part| part.trim().parse::<usize>())
                    .collect::<Result<Vec<_>, _>>()
                    .context("--lengths must be a comma-separated list of byte offsets")?;
            }
            "--min-frame" => {
                min_frame = Some(
                    iter.next()
                        .context("--min-frame needs a value")?
                        .parse::<i64>()
                        .context("--min-frame must be epoch milliseconds")?,
                );
            }
            "--max-frame" => {
                max_frame = Some(
                    iter.next()
                        .context("--max-frame needs a value")?
                        .parse::<i64>()
                        .context("--max-frame must be epoch milliseconds")?,
                );
            }
            "--interval" => {
                interval = iter
                    .next()
                    .context("--interval needs a value")?
                    .parse::<Interval>()?;
            }
            "--sublayers" => {
                sublayers = Some(
                    iter.next()
                        .context("--sublayers needs a value")?
                        .parse::<usize>()
                        .context("--sublayers must be a count")?,
                );
            }
            "--cols" => {
                cols = iter
                    .next()
                    .context("--cols needs a value")?
                    .parse::<u32>()
                    .context("--cols must be a count")?;
            }
            "--rows" => {
                rows = iter
                    .next()
                    .context("--rows needs a value")?
                    .parse::<u32>()
                    .context("--rows must be a count")?;
            }
            "--config" => {
                config_path = Some(iter.next().context("--config needs a path")?.clone());
            }
            "--json" => json = true,
            "--help" | "-h" => bail!("{}", usage()),
            other if other.starts_with("--") => bail!("unknown flag {other}\n\n{}", usage()),
            other => {
                if payload_path.replace(other.to_string()).is_some() {
                    bail!("more than one payload file given\n\n{}", usage());
                }
            }
        }
    }

    let payload_path = payload_path.with_context(|| format!("no payload file given\n\n{}", usage()))?;
    if lengths.is_empty() {
        bail!("--lengths is required\n\n{}", usage());
    }
    let min_frame = min_frame.with_context(|| format!("--min-frame is required\n\n{}", usage()))?;
    let max_frame = max_frame.with_context(|| format!("--max-frame is required\n\n{}", usage()))?;

    Ok(CliArgs {
        payload_path,
        lengths,
        min_frame,
        max_frame,
        interval,
        sublayers,
        cols,
        rows,
        config_path,
        json,
    })
}

fn print_summary(tile: &TileData, interval: Interval) {
    println!(
        "tile {}x{}, {} cells populated ({})",
        tile.cols,
        tile.rows,
        tile.cells.len(),
        interval
    );

    let sublayer_count = tile.cells.first().map_or(0, |cell| cell.sublayers.len());
    for sublayer in 0..sublayer_count {
        let mut cells_with_data = 0usize;
        let mut samples = 0usize;
        for cell in &tile.cells {
            if let Some(series) = &cell.sublayers[sublayer] {
                cells_with_data += 1;
                samples += series.iter().flatten().count();
            }
        }
        println!("  sublayer {sublayer}: {cells_with_data} cells with data, {samples} samples");
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let payload = fs::read(&cli.payload_path)
        .with_context(|| format!("reading payload file {}", cli.payload_path))?;

    let format = match &cli.config_path {
        Some(path) => FormatConfig::load_from_path(path),
        None => FormatConfig::load(),
    };

    let options = TileOptions {
        cols: cli.cols,
        rows: cli.rows,
        min_frame: cli.min_frame,
        max_frame: cli.max_frame,
        interval: cli.interval,
        sublayers: cli.sublayers.unwrap_or(cli.lengths.len()),
        buffer_lengths: cli.lengths,
        format,
    };

    let tile = decode_tile(&payload, &options)
        .with_context(|| format!("decoding tile {}", cli.payload_path))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tile)?);
    } else {
        print_summary(&tile, options.interval);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_a_full_command_line() {
        let cli = parse_args(&args(&[
            "tile.bin",
            "--lengths",
            "10,25,40",
            "--min-frame",
            "0",
            "--max-frame",
            "86400000",
            "--interval",
            "10DAYS",
            "--cols",
            "113",
            "--rows",
            "53",
            "--json",
        ]))
        .unwrap();

        assert_eq!(cli.payload_path, "tile.bin");
        assert_eq!(cli.lengths, vec![10, 25, 40]);
        assert_eq!(cli.interval, Interval::TenDays);
        assert_eq!(cli.sublayers, None);
        assert_eq!((cli.cols, cli.rows), (113, 53));
        assert!(cli.json);
    }

    #[test]
    fn missing_lengths_is_an_error() {
        let err = parse_args(&args(&["tile.bin", "--min-frame", "0", "--max-frame", "1"]))
            .unwrap_err();
        assert!(err.to_string().contains("--lengths"));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let err = parse_args(&args(&["tile.bin", "--wat"])).unwrap_err();
        assert!(err.to_string().contains("unknown flag"));
    }
}
