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

use serde::{Deserialize, Serialize};

use crate::*;

/// Application parameters
///
/// Missing fields take the reference values when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Keys used for OTAA, the device EUI is only used if none is programmed
    pub identity: DeviceIdentity,
    pub uplink_interval_ms: TimeMs,
    pub uplink_port: u8,
    pub transmission: TransmissionType,
    pub join_mode: JoinMode,
    pub band: IsmBand,
    pub device_class: DeviceClass,
    pub data_rate: u8,
    /// Adaptive data rate
    pub adr: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: DeviceIdentity::default(),
            uplink_interval_ms: APP_TIMEOUT_MS,
            uplink_port: APP_PORT,
            transmission: TransmissionType::Unconfirmed,
            join_mode: JoinMode::Otaa,
            band: IsmBand::Eu868,
            device_class: DeviceClass::ClassA,
            data_rate: APP_DATA_RATE,
            adr: false,
        }
    }
}

impl SessionConfig {
    /// Attributes written to the stack before the first join, in order
    pub(crate) fn stack_attributes(&self, identity: &DeviceIdentity) -> [Attribute; 6] {
        [
            Attribute::DeviceClass(self.device_class),
            Attribute::DataRate(self.data_rate),
            Attribute::DevEui(identity.dev_eui),
            Attribute::AppEui(identity.app_eui),
            Attribute::AppKey(identity.app_key),
            Attribute::Adr(self.adr),
        ]
    }
}
