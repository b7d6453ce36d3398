//! The physical Q-Less dice, for generating rolls.
//!
//! The letter distribution is the one printed on the actual game's twelve
//! dice (as catalogued on BoardGameGeek). Note there is no Q: every die face
//! is one of the other 25 letters, weighted toward common consonants, with
//! two vowel-heavy dice.

use rand::Rng;

use crate::letters::ROLL_SIZE;

/// Faces per die.
pub const FACES: usize = 6;

/// The face letters of the twelve standard dice.
pub const QLESS_DICE: [[char; FACES]; ROLL_SIZE] = [
    ['m', 'm', 'l', 'l', 'b', 'y'],
    ['v', 'f', 'g', 'k', 'p', 'p'],
    ['h', 'h', 'n', 'n', 'r', 'r'],
    ['d', 'f', 'r', 'l', 'l', 'w'],
    ['r', 'r', 'd', 'l', 'g', 'g'],
    ['x', 'k', 'b', 's', 'z', 'n'],
    ['w', 'h', 'h', 't', 't', 'p'],
    ['c', 'c', 'b', 't', 'j', 'd'],
    ['c', 'c', 'm', 't', 't', 's'],
    ['o', 'i', 'i', 'n', 'n', 'y'],
    ['a', 'e', 'i', 'o', 'u', 'u'],
    ['a', 'a', 'e', 'e', 'o', 'o'],
];

/// A set of dice that can be rolled to produce a 12-letter string.
#[derive(Debug, Clone)]
pub struct DiceSet {
    dice: [[char; FACES]; ROLL_SIZE],
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl DiceSet {
    /// The standard Q-Less dice.
    #[must_use]
    pub fn standard() -> DiceSet {
        DiceSet { dice: QLESS_DICE }
    }

    /// Roll every die once, returning the 12 face letters as a lowercase
    /// string in die order.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.dice.iter().map(|die| die[rng.gen_range(0..FACES)]).collect()
    }

    /// Roll with explicit face indices (one per die, modulo [`FACES`]).
    /// Deterministic counterpart of [`roll`](Self::roll) for tests.
    #[must_use]
    pub fn roll_with_faces(&self, faces: &[usize; ROLL_SIZE]) -> String {
        self.dice
            .iter()
            .zip(faces.iter())
            .map(|(die, &face)| die[face % FACES])
            .collect()
    }
}

/// Generate a random roll with the standard dice and a thread-local RNG.
#[must_use]
pub fn generate_random_roll() -> String {
    DiceSet::standard().roll(&mut rand::thread_rng())
}
