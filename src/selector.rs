use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

const MULTI_PICK_LIMIT: usize = 3;

/// Upper bound on redraws when looking for a set that differs from the current one.
pub const MAX_REDRAWS: usize = 50;

/// How many emoticons go on a single message, fixed once per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmoticonSelector {
    /// One emoticon, for regular accounts.
    Single,
    /// Up to three distinct emoticons, for premium accounts.
    Multi,
}

impl EmoticonSelector {
    pub fn for_account(premium: bool) -> Self {
        if premium {
            Self::Multi
        } else {
            Self::Single
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, emoticons: &[String], rng: &mut R) -> Vec<String> {
        match self {
            Self::Single => emoticons.choose(rng).cloned().into_iter().collect(),
            Self::Multi => emoticons
                .choose_multiple(rng, MULTI_PICK_LIMIT.min(emoticons.len()))
                .cloned()
                .collect(),
        }
    }

    /// Draws until the result differs from `current` as a set.
    ///
    /// Gives up after [`MAX_REDRAWS`] and returns the last draw.
    pub fn pick_different<R: Rng + ?Sized>(
        &self,
        emoticons: &[String],
        current: &[String],
        rng: &mut R,
    ) -> Vec<String> {
        let current: HashSet<&String> = current.iter().collect();
        let mut picked = Vec::new();
        for _ in 0..MAX_REDRAWS {
            picked = self.pick(emoticons, rng);
            if picked.iter().collect::<HashSet<_>>() != current {
                break;
            }
        }
        picked
    }
}
