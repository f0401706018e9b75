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

//! Uplink payload encoding
//!
//! | byte | content                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | light sensor sample                                      |
//! | 1-4  | temperature in Celsius as ASCII, e.g. `"25.0"`           |
//!
//! The temperature is formatted with one fractional digit and cut after four characters, so
//! temperatures with three integer digits (or two and a sign) lose the fractional digit.
//! Shorter strings are padded with zeros.

use core::fmt::{self, Write};

use crate::*;

pub const PAYLOAD_SIZE: usize = 5;

const TEMPERATURE_OFFSET: usize = 1;
const TEMPERATURE_SIZE: usize = PAYLOAD_SIZE - TEMPERATURE_OFFSET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UplinkPayload([u8; PAYLOAD_SIZE]);

/// Sent if no sample has been taken yet: no light, 25.0°C
impl Default for UplinkPayload {
    fn default() -> Self {
        Self([0x00, 0x32, 0x35, 0x2E, 0x30])
    }
}

impl UplinkPayload {
    pub fn encode(illuminance: Illuminance, temperature: Celsius) -> Self {
        let mut temperature_text = FixedWidth::<TEMPERATURE_SIZE>::default();
        // never fails, excess characters are dropped
        let _ = write!(temperature_text, "{:.1}", temperature.0);

        let mut bytes = [0u8; PAYLOAD_SIZE];
        bytes[0] = illuminance.0;
        bytes[TEMPERATURE_OFFSET..].copy_from_slice(&temperature_text.buffer);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn illuminance(&self) -> Illuminance {
        Illuminance(self.0[0])
    }

    /// Temperature characters without zero padding
    pub fn temperature_text(&self) -> &[u8] {
        let text = &self.0[TEMPERATURE_OFFSET..];
        let len = text.iter().position(|b| *b == 0).unwrap_or(text.len());
        &text[..len]
    }
}

impl fmt::Display for UplinkPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Hex(&self.0))
    }
}

/// Keeps the first `N` bytes written to it
struct FixedWidth<const N: usize> {
    buffer: [u8; N],
    len: usize,
}

impl<const N: usize> Default for FixedWidth<N> {
    fn default() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
        }
    }
}

impl<const N: usize> Write for FixedWidth<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let count = s.len().min(N - self.len);
        self.buffer[self.len..self.len + count].copy_from_slice(&s.as_bytes()[..count]);
        self.len += count;
        Ok(())
    }
}
