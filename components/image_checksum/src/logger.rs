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

//! Prints status lines, colored by log level

use colored::Colorize;
use log::{Level, Metadata, Record, SetLoggerError};

pub struct ToolLogger {
    max_level: Level,
}

impl log::Log for ToolLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let msg = record.args().to_string();

        let msg = match record.level() {
            Level::Error => msg.bright_red().bold(),
            Level::Warn => msg.bright_yellow().bold(),
            Level::Info => msg.normal(),
            Level::Debug => msg.bright_blue(),
            Level::Trace => msg.dimmed(),
        };

        println!("{msg}");
    }

    fn flush(&self) {}
}

pub fn init(max_level: Level) -> Result<(), SetLoggerError> {
    let logger = Box::new(ToolLogger { max_level });
    log::set_logger(Box::leak(logger))?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}
