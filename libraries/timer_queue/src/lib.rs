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

//! Queue of items due at a point in time, earliest first.
//!
//! Items due at the same time are returned in the order they were pushed.

pub type Time = u64;

pub struct TimerQueue<T> {
    head: Option<Box<Entry<T>>>,
    len: usize,
}

struct Entry<T> {
    at: Time,
    item: T,
    next: Option<Box<Entry<T>>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn push(&mut self, at: Time, item: T) {
        let mut entry = Box::new(Entry {
            at,
            item,
            next: None,
        });

        let mut cursor = &mut self.head;
        loop {
            // insert behind everything due at or before `at`
            if cursor.as_ref().map_or(true, |e| e.at > at) {
                entry.next = cursor.take();
                *cursor = Some(entry);
                self.len += 1;
                return;
            }
            let e = cursor.as_mut().unwrap();
            cursor = &mut e.next;
        }
    }

    /// Remove the earliest item
    pub fn pop(&mut self) -> Option<(Time, T)> {
        self.head.take().map(|head| {
            let head = *head;
            self.head = head.next;
            self.len -= 1;
            (head.at, head.item)
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
