//! Crawl frontier
//!
//! URLs are dequeued in discovery order (breadth-first). A URL is queued at
//! most once while pending; membership is tracked alongside the queue.

use std::collections::{HashSet, VecDeque};

/// Discovered-but-unvisited URLs awaiting traversal
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    pending: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed URL
    pub fn with_seed(seed: impl Into<String>) -> Self {
        let mut frontier = Self::new();
        frontier.push(seed);
        frontier
    }

    /// Queues `url` unless it is already pending
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly queued
    pub fn push(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.pending.contains(&url) {
            return false;
        }
        self.pending.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest pending URL
    pub fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.pending.remove(&url);
        Some(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pending.contains(url)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
