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

//! Collects session event log lines (`$uptime;device;kind;content`) into a CSV file

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

pub const EVENT_INDICATOR_CHAR: char = '$';

pub const FILE_HEADER: &str = "uptime;device;kind;content";

/// Returns the event part of a log message, `None` if the message is no event
pub fn strip_indicator(message: &str) -> Option<&str> {
    message.strip_prefix(EVENT_INDICATOR_CHAR)
}

pub struct SessionEventWriter<W: Write = BufWriter<File>> {
    out: W,
    events: usize,
}

impl SessionEventWriter {
    /// Create (or truncate) the file at `path` and write the header
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> SessionEventWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{FILE_HEADER}")?;
        Ok(Self { out, events: 0 })
    }

    /// Write a single event, with or without the leading indicator char
    pub fn write_event(&mut self, event: &str) -> io::Result<()> {
        let event = strip_indicator(event).unwrap_or(event);
        if event.contains('\n') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "event spans multiple lines",
            ));
        }
        writeln!(self.out, "{event}")?;
        self.events += 1;
        Ok(())
    }

    /// Number of events written so far
    pub fn events(&self) -> usize {
        self.events
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
