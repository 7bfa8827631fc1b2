//  _____       ______   ____
// |_   _|     |  ____|/ ____|  Institute of Embedded Systems
//   | |  _ __ | |__  | (___    Zurich University of Applied Sciences
//   | | | '_ \|  __|  \___ \   8401 Winterthur, Switzerland
//  _| |_| | | | |____ ____) |
// |_____|_| |_|______|_____/
//
// Copyright 2025 Institute of Embedded Systems at Zurich University of Applied Sciences.
// All rights reserved.
// SPDX-License-Identifier: MIT

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use log::Level;
use std::path::PathBuf;

use crate::{error::EXIT_ARGUMENTS, image::PaddingRequest};

const KILOBYTE: i64 = 1024;

#[derive(Debug, Parser)]
#[command(version, about = "Appends the CRC of the stm32 CRC peripheral to a binary image")]
pub struct Cli {
    /// image file
    #[arg(short, long, default_value = "file.bin")]
    pub file: PathBuf,

    /// pad file up to a certain size
    #[arg(short, long)]
    pub pad_file: bool,

    /// pad size in bytes or kilobytes (K)
    #[arg(
        short = 's',
        long,
        default_value = "0",
        value_parser = parse_pad_size,
        allow_negative_numbers = true
    )]
    pub pad_size: i64,

    /// pad byte
    #[arg(
        short = 'b',
        long,
        default_value = "255",
        value_parser = parse_integer,
        allow_negative_numbers = true
    )]
    pub pad_byte: i64,

    /// print more (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn padding(&self) -> Option<PaddingRequest> {
        self.pad_file.then_some(PaddingRequest {
            target_size: self.pad_size,
            fill_byte: self.pad_byte,
        })
    }

    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::Warn,
            (false, 0) => Level::Info,
            (false, 1) => Level::Debug,
            (false, _) => Level::Trace,
        }
    }
}

/// Accepts a number of bytes or, with a `K` suffix, kilobytes
pub fn parse_pad_size(arg: &str) -> Result<i64> {
    let (number, multiplier) = match arg.strip_suffix(['k', 'K']) {
        Some(number) => (number, KILOBYTE),
        None => (arg, 1),
    };

    parse_integer(number)?
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow!("pad size out of range: {arg}"))
}

/// Parses a decimal or `0x` prefixed hexadecimal integer. Range checks are left to the padding
/// validation.
pub fn parse_integer(arg: &str) -> Result<i64> {
    let (negative, digits) = match arg.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, arg),
    };

    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    }
    .with_context(|| format!("invalid integer: {arg:?}"))?;

    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };

    value.ok_or_else(|| anyhow!("integer out of range: {arg}"))
}

/// Help and version are reported through [`clap::Error`] too but are not failures
pub fn arguments_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_ARGUMENTS
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_size() {
        assert_eq!(parse_pad_size("0").unwrap(), 0);
        assert_eq!(parse_pad_size("1024").unwrap(), 1024);
        assert_eq!(parse_pad_size("16K").unwrap(), 16 * 1024);
        assert_eq!(parse_pad_size("256k").unwrap(), 256 * 1024);
        assert_eq!(parse_pad_size("0x100").unwrap(), 256);
        // negative sizes are rejected later by the padding validation
        assert_eq!(parse_pad_size("-4").unwrap(), -4);
        assert_eq!(parse_pad_size("-1K").unwrap(), -1024);
    }

    #[test]
    fn invalid_pad_size() {
        assert!(parse_pad_size("").is_err());
        assert!(parse_pad_size("K").is_err());
        assert!(parse_pad_size("16M").is_err());
        assert!(parse_pad_size("12.5").is_err());
        assert!(parse_pad_size(&format!("{}K", i64::MAX)).is_err());
    }

    #[test]
    fn integer() {
        assert_eq!(parse_integer("255").unwrap(), 255);
        assert_eq!(parse_integer("0xff").unwrap(), 255);
        assert_eq!(parse_integer("0XAA").unwrap(), 0xaa);
        assert_eq!(parse_integer("-1").unwrap(), -1);
        assert_eq!(parse_integer("300").unwrap(), 300);
        assert!(parse_integer("0xg").is_err());
        assert!(parse_integer("-").is_err());
    }

    #[test]
    fn integer_limits() {
        assert_eq!(parse_integer("9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(parse_integer("-9223372036854775808").unwrap(), i64::MIN);
        assert_eq!(parse_integer("-0x8000000000000000").unwrap(), i64::MIN);
        assert!(parse_integer("9223372036854775808").is_err());
        assert!(parse_integer("-9223372036854775809").is_err());
        assert!(parse_integer("--9223372036854775808").is_err());
        assert!(parse_integer("--5").is_err());
        assert!(parse_pad_size("--9223372036854775808").is_err());
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["stm32_image_checksum"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("file.bin"));
        assert!(cli.padding().is_none());
        assert_eq!(cli.log_level(), Level::Info);
    }

    #[test]
    fn padding_arguments() {
        let cli = Cli::try_parse_from([
            "stm32_image_checksum",
            "-f",
            "image.bin",
            "-p",
            "-s",
            "64K",
            "-b",
            "0",
        ])
        .unwrap();
        let padding = cli.padding().unwrap();
        assert_eq!(padding.target_size, 64 * 1024);
        assert_eq!(padding.fill_byte, 0);

        let cli = Cli::try_parse_from([
            "stm32_image_checksum",
            "--pad-file",
            "--pad-size",
            "-8",
            "--pad-byte",
            "256",
        ])
        .unwrap();
        let padding = cli.padding().unwrap();
        assert_eq!(padding.target_size, -8);
        assert_eq!(padding.fill_byte, 256);
    }

    #[test]
    fn pad_size_without_pad_file_is_ignored() {
        let cli = Cli::try_parse_from(["stm32_image_checksum", "-s", "16"]).unwrap();
        assert!(cli.padding().is_none());
    }

    #[test]
    fn verbosity() {
        let cli = Cli::try_parse_from(["stm32_image_checksum", "-vv"]).unwrap();
        assert_eq!(cli.log_level(), Level::Trace);
        let cli = Cli::try_parse_from(["stm32_image_checksum", "-q"]).unwrap();
        assert_eq!(cli.log_level(), Level::Warn);
        assert!(Cli::try_parse_from(["stm32_image_checksum", "-q", "-v"]).is_err());
    }

    #[test]
    fn invalid_arguments() {
        assert!(Cli::try_parse_from(["stm32_image_checksum", "--unknown"]).is_err());
        assert!(Cli::try_parse_from(["stm32_image_checksum", "-s", "abc"]).is_err());
        let err = Cli::try_parse_from(["stm32_image_checksum", "--unknown"]).unwrap_err();
        assert_eq!(arguments_exit_code(&err), EXIT_ARGUMENTS);
        let err = Cli::try_parse_from(["stm32_image_checksum", "-b", "--1"]).unwrap_err();
        assert_eq!(arguments_exit_code(&err), EXIT_ARGUMENTS);
        let err = Cli::try_parse_from(["stm32_image_checksum", "--help"]).unwrap_err();
        assert_eq!(arguments_exit_code(&err), 0);
        let err = Cli::try_parse_from(["stm32_image_checksum", "--version"]).unwrap_err();
        assert_eq!(arguments_exit_code(&err), 0);
    }
}
