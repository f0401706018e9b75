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

//! Session and uplink scheduling of a LoRaWAN light and temperature sensor node
//!
//! [`DeviceSession`] owns the join state, the application timer and the status LEDs. All input
//! arrives through [`DeviceSession::dispatch`], one [`Event`] at a time.

#![cfg_attr(not(test), no_std)]

use node_api::*;

mod config;
mod dispatcher;
mod error;
mod event_log;
mod hex;
mod identity;
mod indicator;
mod payload;
mod scheduler;
mod sensors;
mod session;
mod state_machine;
mod states;

#[cfg(test)]
mod mock;

pub use crate::{
    config::SessionConfig,
    error::{Error, TransmitFailure},
    hex::Hex,
    identity::{DeviceIdentity, UNPROGRAMMED_EUI},
    indicator::{IndicatorChange, IndicatorState, Outcome},
    payload::{UplinkPayload, PAYLOAD_SIZE},
    sensors::{Celsius, Illuminance, Measurement, SensorSampler, Tenths},
    session::{DeviceSession, Peripherals},
    states::SessionState,
};

#[cfg(feature = "defmt")]
#[allow(unused_imports)]
use defmt::{debug, error, info, warn};

#[cfg(not(feature = "defmt"))]
#[allow(unused_imports)]
use log::{debug, error, info, warn};

/// Period of the application timer
pub const APP_TIMEOUT_MS: TimeMs = 60 * 1000;
/// Port sensor data is sent on
pub const APP_PORT: u8 = 2;
/// Data rate set before the first join (SF7 BW125 in EU868)
pub const APP_DATA_RATE: u8 = 5;

/// Used if the debugger chip has no EUI programmed
pub const DEFAULT_DEV_EUI: Eui64 = [0x00; 8];
pub const DEFAULT_APP_EUI: Eui64 = [0x70, 0xB3, 0xD5, 0x7E, 0xD0, 0x01, 0x63, 0xE5];
pub const DEFAULT_APP_KEY: AesKey = [
    0x4C, 0xC8, 0x90, 0x59, 0x02, 0x08, 0x69, 0x82, 0xD3, 0x4C, 0xB4, 0x13, 0x96, 0xD4, 0xE0, 0x3E,
];
