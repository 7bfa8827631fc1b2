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

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod error;
mod image;
mod logger;

use crate::{cli::*, error::*, image::*};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.print().is_err() {
                eprintln!("{err}");
            }
            return ExitCode::from(arguments_exit_code(&err));
        }
    };

    if let Err(err) = logger::init(cli.log_level()) {
        eprintln!("could not initialize logger: {err}");
        return ExitCode::FAILURE;
    }

    info!("STM32 binary-image checksum tool");

    match append_checksum(&cli.file, cli.padding(), stm32_crc::init()) {
        Ok(appended) => {
            info!("CRC appended to file: {:#x}", appended.crc);
            debug!("file size: {} bytes", appended.file_size());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
