//! Random-character reveal for table fields that changed.

use std::collections::HashMap;

use rand::Rng;
use shared::{DashboardError, ShuffleConfig};

const POOL: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789,.?/\\(^)![]{}*&^%$#";

/// Frames of a shuffle reveal. A window of `steps_per_frame` scrambled
/// characters slides across the text one position per frame; the last frame
/// is the text itself.
pub struct ShuffleFrames<R> {
    chars: Vec<char>,
    step: isize,
    start: isize,
    rng: R,
}

impl<R: Rng> ShuffleFrames<R> {
    pub fn new(text: &str, config: ShuffleConfig, rng: R) -> Self {
        let step = config.steps_per_frame.max(1) as isize;
        Self {
            chars: text.chars().collect(),
            step,
            start: -step,
            rng,
        }
    }

    fn remaining(&self) -> usize {
        let len = self.chars.len() as isize;
        (len - self.start + 1).max(0) as usize
    }
}

impl<R: Rng> Iterator for ShuffleFrames<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let len = self.chars.len() as isize;
        if self.start > len {
            return None;
        }

        let mut frame = self.chars.clone();
        let from = self.start.max(0);
        let to = (self.start + self.step).min(len);
        for index in from..to {
            frame[index as usize] = POOL[self.rng.gen_range(0..POOL.len())] as char;
        }
        self.start += 1;
        Some(frame.into_iter().collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for ShuffleFrames<R> {}

/// Proof that a shuffle was started; hand it back to `finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTicket {
    element_id: String,
    generation: u64,
}

impl AnimationTicket {
    pub fn element_id(&self) -> &str {
        &self.element_id
    }
}

/// Elements with a shuffle in progress; a second shuffle on the same element
/// is refused until the first finishes or the element is replaced.
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    animating: HashMap<String, u64>,
    next_generation: u64,
}

impl AnimationRegistry {
    pub fn try_begin(&mut self, element_id: &str) -> Result<AnimationTicket, DashboardError> {
        if self.animating.contains_key(element_id) {
            return Err(DashboardError::AnimationReentrancy(element_id.to_string()));
        }
        self.next_generation += 1;
        self.animating
            .insert(element_id.to_string(), self.next_generation);
        Ok(AnimationTicket {
            element_id: element_id.to_string(),
            generation: self.next_generation,
        })
    }

    /// A ticket from before `supersede_all` releases nothing.
    pub fn finish(&mut self, ticket: &AnimationTicket) {
        if self.animating.get(&ticket.element_id) == Some(&ticket.generation) {
            self.animating.remove(&ticket.element_id);
        }
    }

    /// Every animated element was replaced. Running shuffles keep writing to
    /// their detached nodes while the new nodes are free to animate.
    pub fn supersede_all(&mut self) {
        self.animating.clear();
    }

    pub fn is_animating(&self, element_id: &str) -> bool {
        self.animating.contains_key(element_id)
    }
}
