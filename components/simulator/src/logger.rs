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

//! Console logger of the simulator
//!
//! Every record is printed with a colored level tag. Session event lines (`$...`) are also
//! appended to the event file when one is configured.

use log::{Level, Metadata, Record};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::Mutex,
};

use session_event_writer::{strip_indicator, SessionEventWriter};

const RESET: &str = "\x1B[0m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1B[1;31m",
        Level::Warn => "\x1B[1;33m",
        Level::Info => "\x1B[1;32m",
        Level::Debug => "\x1B[1;36m",
        Level::Trace => "\x1B[2m",
    }
}

fn console_line(record: &Record, msg: &str) -> String {
    format!(
        "{}{:<5}{} {}: {}",
        level_color(record.level()),
        record.level(),
        RESET,
        record.target(),
        msg
    )
}

pub struct SimLogger<W: Write = BufWriter<File>> {
    max_level: Level,
    events: Option<Mutex<SessionEventWriter<W>>>,
}

impl<W: Write> SimLogger<W> {
    fn new(max_level: Level, events: Option<SessionEventWriter<W>>) -> Self {
        Self {
            max_level,
            events: events.map(Mutex::new),
        }
    }

    fn record_event(&self, msg: &str) {
        let Some(event) = strip_indicator(msg) else {
            return;
        };
        let Some(Ok(mut events)) = self.events.as_ref().map(Mutex::lock) else {
            return;
        };
        if let Err(err) = events.write_event(event) {
            eprintln!("event {event:?} not written: {err}");
        }
    }
}

impl<W: Write + Send> log::Log for SimLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        self.record_event(&msg);
        println!("{}", console_line(record, &msg));
    }

    fn flush(&self) {
        let Some(Ok(mut events)) = self.events.as_ref().map(Mutex::lock) else {
            return;
        };
        if let Err(err) = events.flush() {
            eprintln!("event file not flushed: {err}");
        }
    }
}

/// Install the logger, events go to `event_file_path` if given
pub fn init(max_level: Level, event_file_path: Option<&Path>) -> Result<(), String> {
    let events = match event_file_path {
        Some(path) => Some(
            SessionEventWriter::create(path)
                .map_err(|err| format!("unable to create {}: {err}", path.display()))?,
        ),
        None => None,
    };
    let logger: &'static SimLogger = Box::leak(Box::new(SimLogger::new(max_level, events)));
    log::set_logger(logger).map_err(|err| err.to_string())?;
    log::set_max_level(max_level.to_level_filter());
    Ok(())
}
