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

//! Macros for generating parseable event log messages
//!
//! Lines start with `$` followed by `uptime;device;kind;content`, content is JSON.

#[macro_export]
macro_rules! event_log {
    ($uptime:expr,$device:expr,$kind:expr,$content:expr) => {
        info!("${};{:x};{};{}", $uptime, $device, $kind, $content);
    };
}

#[macro_export]
macro_rules! event_log_start {
    ($uptime:expr,$device:expr,$band:expr) => {
        info!("${};{:x};start;{{\"band\":\"{:?}\"}}", $uptime, $device, $band);
    };
}

#[macro_export]
macro_rules! event_log_state {
    ($uptime:expr,$device:expr,$new_state:expr) => {
        info!("${};{:x};state;\"{}\"", $uptime, $device, $new_state);
    };
}

#[macro_export]
macro_rules! event_log_uplink {
    ($uptime:expr,$device:expr,$port:expr,$payload:expr) => {
        info!(
            "${};{:x};uplink;{{\"port\":{},\"payload\":\"{}\"}}",
            $uptime, $device, $port, $payload
        );
    };
}

#[macro_export]
macro_rules! event_log_indicator {
    ($uptime:expr,$device:expr,$state:expr) => {
        info!(
            "${};{:x};indicator;{{\"green\":{},\"amber\":{}}}",
            $uptime, $device, $state.green, $state.amber
        );
    };
}

#[macro_export]
macro_rules! event_log_transaction {
    ($uptime:expr,$device:expr,$status:expr) => {
        event_log!($uptime, $device, "transaction", $status);
    };
}
