//! Session code generation.

use rand::Rng;

use initiative_core::types::SessionCode;

/// Characters used in generated codes. Look-alikes (0/O, 1/I) are left out.
pub(crate) const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates random human-typeable session codes.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator for codes of `length` characters (at least 1).
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    /// Configured code length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates a fresh code. Uniqueness is the caller's concern.
    pub fn generate(&self) -> SessionCode {
        self.generate_with_length(self.length)
    }

    /// Generates a code of `length` characters, ignoring the configured one.
    pub fn generate_with_length(&self, length: usize) -> SessionCode {
        let mut rng = rand::thread_rng();
        let raw: String = (0..length.max(1))
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        SessionCode::from_generated(raw)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(5)
    }
}
