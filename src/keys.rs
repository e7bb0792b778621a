//! Debounced keyboard input: raw held levels in, one-shot pressed edges out.

use bitflags::bitflags;
use winit::keyboard::KeyCode;

bitflags! {
    /// One bit per tracked action key.
    ///
    /// Keys are independent: a poll may report any subset, and
    /// simultaneous presses combine by union with no precedence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyMask: u8 {
        const FORWARD  = 1 << 0;
        const BACK     = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
        const INCREASE = 1 << 4;
        const DECREASE = 1 << 5;
    }
}

/// Map a physical key to its action bit: W/S/A/D move, `=`/`-` adjust.
pub fn action_for(code: KeyCode) -> Option<KeyMask> {
    match code {
        KeyCode::KeyW => Some(KeyMask::FORWARD),
        KeyCode::KeyS => Some(KeyMask::BACK),
        KeyCode::KeyA => Some(KeyMask::LEFT),
        KeyCode::KeyD => Some(KeyMask::RIGHT),
        KeyCode::Equal => Some(KeyMask::INCREASE),
        KeyCode::Minus => Some(KeyMask::DECREASE),
        _ => None,
    }
}

/// Rising-edge detector over per-frame polls.
///
/// [`set_held`](Self::set_held) records the current level of a key as
/// window events arrive; [`poll`](Self::poll) reports the keys that went
/// from released to held since the previous poll and advances the
/// baseline unconditionally, whether or not a key contributed an edge.
/// A key held across N polls yields exactly one edge. A press and
/// release that both happen between two polls is never observed; this
/// is an edge detector, not a timer.
#[derive(Debug, Default)]
pub struct KeyTracker {
    held: KeyMask,
    prev: KeyMask,
}

impl KeyTracker {
    pub fn set_held(&mut self, action: KeyMask, down: bool) {
        self.held.set(action, down);
    }

    pub fn poll(&mut self) -> KeyMask {
        let pressed = self.held & !self.prev;
        self.prev = self.held;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed a sequence of held-level samples, polling once per sample.
    fn poll_sequence(samples: &[KeyMask]) -> Vec<KeyMask> {
        let mut tracker = KeyTracker::default();
        samples
            .iter()
            .map(|&held| {
                tracker.held = held;
                tracker.poll()
            })
            .collect()
    }

    #[test]
    fn continuous_hold_yields_single_edge() {
        let held = [KeyMask::FORWARD; 5];
        let masks = poll_sequence(&held);
        assert_eq!(masks[0], KeyMask::FORWARD);
        assert!(masks[1..].iter().all(KeyMask::is_empty));
    }

    #[test]
    fn forward_held_on_polls_two_through_four() {
        let f = KeyMask::FORWARD;
        let none = KeyMask::empty();
        let masks = poll_sequence(&[none, f, f, f, none, none]);
        assert_eq!(masks, vec![none, f, none, none, none, none]);
    }

    #[test]
    fn release_and_repress_yields_new_edge() {
        let f = KeyMask::FORWARD;
        let none = KeyMask::empty();
        let masks = poll_sequence(&[f, none, f]);
        assert_eq!(masks, vec![f, none, f]);
    }

    #[test]
    fn simultaneous_presses_combine_by_union() {
        let both = KeyMask::LEFT | KeyMask::INCREASE;
        let masks = poll_sequence(&[both, both]);
        assert_eq!(masks[0], both);
        assert!(masks[1].is_empty());
    }

    #[test]
    fn keys_edge_independently() {
        let mut tracker = KeyTracker::default();
        tracker.set_held(KeyMask::FORWARD, true);
        assert_eq!(tracker.poll(), KeyMask::FORWARD);

        // FORWARD stays held while RIGHT arrives: only RIGHT edges.
        tracker.set_held(KeyMask::RIGHT, true);
        assert_eq!(tracker.poll(), KeyMask::RIGHT);

        tracker.set_held(KeyMask::FORWARD, false);
        tracker.set_held(KeyMask::RIGHT, false);
        assert!(tracker.poll().is_empty());
    }

    #[test]
    fn movement_and_adjust_bindings() {
        assert_eq!(action_for(KeyCode::KeyW), Some(KeyMask::FORWARD));
        assert_eq!(action_for(KeyCode::KeyS), Some(KeyMask::BACK));
        assert_eq!(action_for(KeyCode::KeyA), Some(KeyMask::LEFT));
        assert_eq!(action_for(KeyCode::KeyD), Some(KeyMask::RIGHT));
        assert_eq!(action_for(KeyCode::Equal), Some(KeyMask::INCREASE));
        assert_eq!(action_for(KeyCode::Minus), Some(KeyMask::DECREASE));
        assert_eq!(action_for(KeyCode::Space), None);
    }
}
