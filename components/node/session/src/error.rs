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

use core::fmt::{self, Display};

use crate::*;

/// Something that went wrong while handling an event
///
/// None of these are fatal. By the time one is returned the session has already reacted (LEDs,
/// retry) and keeps running; the next timer expiry retries whatever failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Stack refused a join or send request
    RequestRejected(StackError),
    /// Network denied the join, a new join was requested
    JoinDenied,
    TransmitFailed(TransmitFailure),
    /// Sensor could not be read, a fallback value was sent
    SensorReadUnavailable(SensorError),
    /// Stack refused an attribute during start
    Configuration(StackError),
    Timer(TimerError),
}

/// Reason an uplink transaction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitFailure {
    NoChannelsFound,
    Busy,
    Other(StackError),
}

impl TransmitFailure {
    /// `None` for a successful transaction
    pub fn from_status(status: TransactionStatus) -> Option<Self> {
        match status {
            TransactionStatus::Success => None,
            TransactionStatus::NoChannelsFound => Some(TransmitFailure::NoChannelsFound),
            TransactionStatus::Busy => Some(TransmitFailure::Busy),
            TransactionStatus::Failed(err) => Some(TransmitFailure::Other(err)),
        }
    }
}

impl Display for TransmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransmitFailure::NoChannelsFound => write!(f, "no channels found"),
            TransmitFailure::Busy => write!(f, "busy"),
            TransmitFailure::Other(err) => write!(f, "{}", err),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RequestRejected(err) => write!(f, "request rejected: {}", err),
            Error::JoinDenied => write!(f, "join denied"),
            Error::TransmitFailed(failure) => write!(f, "transmission failed: {}", failure),
            Error::SensorReadUnavailable(err) => write!(f, "sensor unavailable: {}", err),
            Error::Configuration(err) => write!(f, "stack configuration failed: {}", err),
            Error::Timer(err) => write!(f, "application timer: {}", err),
        }
    }
}

impl From<TimerError> for Error {
    fn from(err: TimerError) -> Self {
        Error::Timer(err)
    }
}
