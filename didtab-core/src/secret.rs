//! In-memory holder for a revealed recovery phrase.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};
use zeroize::Zeroizing;

/// The wallet's secret recovery phrase, as returned by the keyring after a successful
/// password check.
///
/// # Security
/// The words live in a [`SecretBox`] and are zeroized when the phrase is dropped. The
/// phrase is never logged and `Debug` does not print it. Copies handed to foreign code
/// (clipboard, rendering) are outside of this guarantee.
pub struct SeedPhrase {
    words: SecretBox<Vec<String>>,
}

impl SeedPhrase {
    /// Wraps an ordered list of words.
    #[must_use]
    pub fn from_words(words: Vec<String>) -> Self {
        Self {
            words: SecretBox::new(Box::new(words)),
        }
    }

    /// Joins the words with single spaces. The returned buffer is wiped on drop.
    #[must_use]
    pub fn expose_phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.words.expose_secret().join(" "))
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedPhrase")
            .field("words", &"[REDACTED]")
            .finish()
    }
}
