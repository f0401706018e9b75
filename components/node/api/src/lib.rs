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

//! Interfaces between the sensor node application and the subsystems it drives: the LoRaWAN
//! stack, the software timer service, the sensor drivers and the status LEDs.

#![cfg_attr(not(test), no_std)]

use core::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Time in milliseconds
pub type TimeMs = u64;
/// 64 bit extended unique identifier
pub type Eui64 = [u8; 8];
/// 128 bit AES key
pub type AesKey = [u8; 16];

/// Port byte plus the largest application payload of a downlink
pub const MAX_DOWNLINK_SIZE: usize = 243;

/// An asynchronous event delivered to the application
///
/// Events are delivered one at a time and each one is handled to completion before the next one
/// is delivered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A timer armed with [`TimerService::start`] expired
    TimerExpired(TimerId),
    /// The join procedure finished
    JoinOutcome { accepted: bool },
    /// The stack finished handling the most recent uplink
    TransactionComplete(TransactionStatus),
    /// Data was received in a receive window
    Downlink(Downlink),
}

/// Result of an uplink transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionStatus {
    Success,
    NoChannelsFound,
    Busy,
    Failed(StackError),
}

/// Data received from the network
///
/// The first byte of `data` is the port, the remainder is the application payload. Empty data
/// acknowledges a confirmed uplink.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Downlink {
    pub status: Result<(), StackError>,
    pub data: heapless::Vec<u8, MAX_DOWNLINK_SIZE>,
}

impl Downlink {
    /// Returns `None` if `data` does not fit into a downlink
    pub fn received(data: &[u8]) -> Option<Self> {
        Some(Self {
            status: Ok(()),
            data: heapless::Vec::from_slice(data).ok()?,
        })
    }

    pub fn port(&self) -> Option<u8> {
        self.data.first().copied()
    }

    pub fn payload(&self) -> &[u8] {
        self.data.get(1..).unwrap_or(&[])
    }
}

/// Activation procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinMode {
    /// Over-the-air activation
    Otaa,
    /// Activation by personalization
    Abp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmissionType {
    Unconfirmed,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceClass {
    ClassA,
    ClassB,
    ClassC,
}

/// Regional parameter set the stack is reset to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IsmBand {
    Eu868,
    Na915,
    Au915,
    As923,
    Jpn923,
    Kr920,
    Ind865,
}

/// Stack attributes that must be configured before the first join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attribute {
    DeviceClass(DeviceClass),
    DataRate(u8),
    DevEui(Eui64),
    AppEui(Eui64),
    AppKey(AesKey),
    /// Adaptive data rate
    Adr(bool),
}

/// Uplink submitted to the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendRequest<'a> {
    pub transmission: TransmissionType,
    /// 1-223
    pub port: u8,
    pub buffer: &'a [u8],
}

/// Reason the stack refused a request or failed a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackError {
    InvalidRequest,
    InvalidParameter,
    InvalidBufferLength,
    Busy,
    NoChannelsFound,
    NotJoined,
    MacPaused,
    KeysNotInitialized,
    /// Stack specific status code
    Other(u8),
}

impl Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::InvalidRequest => write!(f, "invalid request"),
            StackError::InvalidParameter => write!(f, "invalid parameter"),
            StackError::InvalidBufferLength => write!(f, "invalid buffer length"),
            StackError::Busy => write!(f, "busy"),
            StackError::NoChannelsFound => write!(f, "no channels found"),
            StackError::NotJoined => write!(f, "not joined"),
            StackError::MacPaused => write!(f, "mac paused"),
            StackError::KeysNotInitialized => write!(f, "keys not initialized"),
            StackError::Other(code) => write!(f, "status {}", code),
        }
    }
}

/// Handle of a software timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// All timers are in use
    NoResources,
    /// Timer has not expired since it was last started
    AlreadyArmed,
    InvalidTimerId,
}

impl Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::NoResources => write!(f, "no timer available"),
            TimerError::AlreadyArmed => write!(f, "timer already armed"),
            TimerError::InvalidTimerId => write!(f, "invalid timer id"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Conversion did not complete in time
    Timeout,
    /// Sensor bus transfer failed
    Bus,
    /// Raw value does not fit the sample type
    OutOfRange(u16),
    /// Driver returned a value that is not a number
    Invalid,
}

impl Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Timeout => write!(f, "conversion timeout"),
            SensorError::Bus => write!(f, "bus error"),
            SensorError::OutOfRange(raw) => write!(f, "raw value {} out of range", raw),
            SensorError::Invalid => write!(f, "invalid reading"),
        }
    }
}

/// Status LED color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Green,
    Amber,
}

/// LoRaWAN MAC layer
///
/// Requests return immediately whether the stack accepted them. The outcome of an accepted join
/// or send is delivered later as an [`Event`].
pub trait RadioStack {
    /// Reset the MAC layer to the defaults of `band`
    fn reset(&mut self, band: IsmBand);

    fn set_attribute(&mut self, attribute: Attribute) -> Result<(), StackError>;

    /// Start the join procedure, the outcome is delivered as [`Event::JoinOutcome`]
    fn join(&mut self, mode: JoinMode) -> Result<(), StackError>;

    /// Submit an uplink, the outcome is delivered as [`Event::TransactionComplete`]
    fn send(&mut self, request: &SendRequest<'_>) -> Result<(), StackError>;
}

/// Single-shot relative software timers
pub trait TimerService {
    fn create(&mut self) -> Result<TimerId, TimerError>;

    /// Arm timer, expiry is delivered once as [`Event::TimerExpired`]
    ///
    /// A timer must not be started again before it expired.
    fn start(&mut self, id: TimerId, duration_ms: TimeMs) -> Result<(), TimerError>;
}

/// Light and temperature sensor drivers
///
/// Reads block until the conversion completed.
pub trait Sensors {
    /// Raw light sensor ADC value
    fn read_illuminance(&mut self) -> Result<u16, SensorError>;

    /// Temperature in degrees Celsius
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

/// Device EUI programmed into the debugger chip
pub trait EuiSource {
    /// Returns all `0xff` if no EUI is programmed
    fn read_eui64(&mut self) -> Eui64;
}

/// Two color status LED
pub trait Indicator {
    fn set(&mut self, color: Color, on: bool);
}
