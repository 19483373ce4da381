//! Play order over a fixed track list.
//!
//! Keeps a permutation of indices into the track list and walks it; when the
//! end is reached it either reshuffles and starts over or reports the end of
//! the queue.

use rand::seq::SliceRandom;

use crate::error::SourceError;

use super::model::Track;

pub(crate) struct Rotation {
    tracks: Vec<Track>,
    order: Vec<usize>,
    pos: usize,
    shuffle: bool,
    repeat: bool,
}

impl Rotation {
    pub fn new(tracks: Vec<Track>, shuffle: bool, repeat: bool) -> Self {
        let mut rotation = Self {
            order: (0..tracks.len()).collect(),
            tracks,
            pos: 0,
            shuffle,
            repeat,
        };
        rotation.reorder();
        rotation
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    fn reorder(&mut self) {
        if self.shuffle {
            self.order.shuffle(&mut rand::rng());
        }
        self.pos = 0;
    }

    /// Take the track with `id` out of the rotation for good.
    ///
    /// The walk through the current order carries on where it was.
    pub fn remove(&mut self, id: &str) -> Option<Track> {
        let index = self.tracks.iter().position(|t| t.id == id)?;
        let slot = self.order.iter().position(|&i| i == index)?;

        self.order.remove(slot);
        if slot < self.pos {
            self.pos -= 1;
        }
        for i in &mut self.order {
            if *i > index {
                *i -= 1;
            }
        }
        Some(self.tracks.remove(index))
    }

    pub fn next(&mut self) -> Result<Track, SourceError> {
        if self.tracks.is_empty() {
            return Err(SourceError::EndOfQueue);
        }
        if self.pos >= self.order.len() {
            if !self.repeat {
                return Err(SourceError::EndOfQueue);
            }
            self.reorder();
        }
        let track = self.tracks[self.order[self.pos]].clone();
        self.pos += 1;
        Ok(track)
    }
}
