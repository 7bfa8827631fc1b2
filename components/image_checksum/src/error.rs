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

use std::{io, path::PathBuf};

pub const EXIT_ARGUMENTS: u8 = 1;
pub const EXIT_FILE_OPEN: u8 = 2;
pub const EXIT_VALIDATION: u8 = 3;
pub const EXIT_ALREADY_CHECKSUMMED: u8 = 4;
pub const EXIT_WRITE: u8 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("invalid padding: {0}")]
    InvalidPaddingConfig(#[from] PaddingError),

    #[error("file size must be multiple of 4 bytes, actual size: {0}")]
    UnalignedImageSize(u64),

    #[error("could not open {} for {mode}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        mode: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("could not read file into buffer: {0}")]
    Read(#[source] io::Error),

    #[error("could not {what}: {source}")]
    Write {
        what: String,
        #[source]
        source: io::Error,
    },

    #[error("CRC is 0, so it has already been appended to {}", .0.display())]
    AlreadyChecksummed(PathBuf),
}

impl ChecksumError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileOpen { .. } => EXIT_FILE_OPEN,
            Self::InvalidPaddingConfig(_) | Self::UnalignedImageSize(_) | Self::Read(_) => {
                EXIT_VALIDATION
            }
            Self::AlreadyChecksummed(_) => EXIT_ALREADY_CHECKSUMMED,
            Self::Write { .. } => EXIT_WRITE,
        }
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaddingError {
    #[error("padded file size must be a positive integer, padded size: {0}")]
    NegativeSize(i64),

    #[error("padded file size must be multiple of 4 bytes, padded size: {0}")]
    UnalignedSize(i64),

    #[error("padded file size must be at least 4 bytes greater than actual file size, padded size: {target_size}, actual size: {image_size}")]
    TooSmall { target_size: u64, image_size: u64 },

    #[error("padding byte must be an 8 bit unsigned integer, actual value: {0}")]
    FillByteOutOfRange(i64),
}
