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

//! Appends the CRC to a binary image so the bootloader can verify it with the CRC peripheral
//!
//! Resulting file layout: image, optional padding, 4 bytes CRC in native byte order.

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    path::Path,
};
use stm32_crc::{Stm32Crc, WORD_SIZE};

use crate::error::{ChecksumError, PaddingError};

const CRC_SIZE: u64 = WORD_SIZE as u64;

/// Padding as given on the command line, not yet validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingRequest {
    /// size of the file after padding and appending the CRC
    pub target_size: i64,
    pub fill_byte: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub target_size: u64,
    pub fill_byte: u8,
    /// number of fill bytes between the image and the CRC
    pub pad_len: u64,
}

impl PaddingRequest {
    pub fn validate(self, image_size: u64) -> Result<Padding, PaddingError> {
        let target_size = u64::try_from(self.target_size)
            .map_err(|_| PaddingError::NegativeSize(self.target_size))?;

        if target_size % CRC_SIZE != 0 {
            return Err(PaddingError::UnalignedSize(self.target_size));
        }

        if target_size < image_size.saturating_add(CRC_SIZE) {
            return Err(PaddingError::TooSmall {
                target_size,
                image_size,
            });
        }

        let fill_byte = u8::try_from(self.fill_byte)
            .map_err(|_| PaddingError::FillByteOutOfRange(self.fill_byte))?;

        Ok(Padding {
            target_size,
            fill_byte,
            pad_len: target_size - CRC_SIZE - image_size,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    pub crc: u32,
    pub image_size: u64,
    pub pad_len: Option<u64>,
}

impl Appended {
    pub fn file_size(&self) -> u64 {
        self.image_size + self.pad_len.unwrap_or(0) + CRC_SIZE
    }
}

pub fn append_checksum(
    path: &Path,
    padding: Option<PaddingRequest>,
    engine: &Stm32Crc,
) -> Result<Appended, ChecksumError> {
    let mut file = File::open(path).map_err(|source| ChecksumError::FileOpen {
        path: path.to_owned(),
        mode: "reading",
        source,
    })?;

    let image_size = file.metadata().map_err(ChecksumError::Read)?.len();
    trace!("{} has {image_size} bytes", path.display());

    let padding = padding
        .map(|request| request.validate(image_size))
        .transpose()?;

    if image_size % CRC_SIZE != 0 {
        return Err(ChecksumError::UnalignedImageSize(image_size));
    }

    let mut crc = {
        let mut buffer = vec![0; buffer_len(image_size).map_err(ChecksumError::Read)?];
        file.read_exact(&mut buffer).map_err(ChecksumError::Read)?;
        info!("Bytes read: {image_size}");
        engine.crc32(&buffer)
    };
    drop(file);

    debug!("CRC of image: {crc:#010x}");

    if crc == 0 {
        if padding.is_some() {
            warn!("CRC is 0, but file is padded anyway");
        } else {
            return Err(ChecksumError::AlreadyChecksummed(path.to_owned()));
        }
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|source| ChecksumError::FileOpen {
            path: path.to_owned(),
            mode: "writing",
            source,
        })?;

    let pad_len = match padding {
        Some(padding) => {
            let pad_len = padding.pad_len;
            let write_error = |source: io::Error| ChecksumError::Write {
                what: format!("pad file with {pad_len} bytes"),
                source,
            };

            let pad = vec![padding.fill_byte; buffer_len(pad_len).map_err(write_error)?];
            // the appended CRC only covers the padding, the CRC of the image is discarded
            crc = engine.crc32(&pad);
            debug!("CRC of padding: {crc:#010x}");

            file.write_all(&pad).map_err(write_error)?;
            info!("File padded with {pad_len} bytes");
            Some(pad_len)
        }
        None => None,
    };

    file.write_all(&crc.to_ne_bytes())
        .map_err(|source| ChecksumError::Write {
            what: format!("append CRC to file {}", path.display()),
            source,
        })?;

    Ok(Appended {
        crc,
        image_size,
        pad_len,
    })
}

fn buffer_len(len: u64) -> io::Result<usize> {
    usize::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::OutOfMemory,
            format!("{len} bytes do not fit into memory"),
        )
    })
}
