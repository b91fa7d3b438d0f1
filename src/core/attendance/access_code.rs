//! Access code generation
//!
//! Codes are read aloud in a classroom, so the alphabet leaves out characters
//! that are easy to confuse (`I`, `O`, `0`, `1`). Allocation is optimistic:
//! draw, check against active sessions, redraw on collision. The storage
//! layer's partial unique index remains the final arbiter.

use crate::config::AccessCodeConfig;
use crate::utils::error::{Result, RollcallError};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Default code alphabet
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Characters never allowed in a code
pub const AMBIGUOUS_CHARACTERS: [char; 4] = ['I', 'O', '0', '1'];

/// Source of candidate codes
pub trait CandidateSource: Send + Sync {
    fn draw(&self, alphabet: &[char], length: usize) -> String;
}

/// Uniform random draws from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSource;

impl CandidateSource for RandomSource {
    fn draw(&self, alphabet: &[char], length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect()
    }
}

/// Lookup of codes currently held by active sessions
#[async_trait]
pub trait CodeRegistry: Send + Sync {
    async fn is_code_in_use(&self, code: &str) -> Result<bool>;
}

/// Generator of unique, speakable access codes
pub struct AccessCodeGenerator {
    alphabet: Vec<char>,
    length: usize,
    max_attempts: u32,
    registry: Arc<dyn CodeRegistry>,
    source: Arc<dyn CandidateSource>,
}

impl std::fmt::Debug for AccessCodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCodeGenerator")
            .field("alphabet", &self.alphabet.iter().collect::<String>())
            .field("length", &self.length)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl AccessCodeGenerator {
    /// Create a generator drawing random candidates
    pub fn new(config: &AccessCodeConfig, registry: Arc<dyn CodeRegistry>) -> Result<Self> {
        Self::with_source(config, registry, Arc::new(RandomSource))
    }

    /// Create a generator with an explicit candidate source
    pub fn with_source(
        config: &AccessCodeConfig,
        registry: Arc<dyn CodeRegistry>,
        source: Arc<dyn CandidateSource>,
    ) -> Result<Self> {
        let alphabet = sanitize_alphabet(&config.alphabet)?;
        if config.length == 0 {
            return Err(RollcallError::config("Access code length must be positive"));
        }
        if config.max_attempts == 0 {
            return Err(RollcallError::config(
                "Access code max_attempts must be positive",
            ));
        }

        Ok(Self {
            alphabet,
            length: config.length,
            max_attempts: config.max_attempts,
            registry,
            source,
        })
    }

    /// Draw a single candidate without checking uniqueness
    pub fn generate_access_code(&self) -> String {
        self.source.draw(&self.alphabet, self.length)
    }

    /// Draw a code that no active session currently holds
    pub async fn generate_unique_access_code(&self) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generate_access_code();
            if !self.registry.is_code_in_use(&candidate).await? {
                debug!("Allocated access code on attempt {}", attempt);
                return Ok(candidate);
            }
            debug!("Access code collision on attempt {}", attempt);
        }

        warn!(
            "Access code allocation exhausted {} attempts",
            self.max_attempts
        );
        Err(RollcallError::conflict(format!(
            "Could not allocate a unique access code after {} attempts",
            self.max_attempts
        )))
    }
}

/// Normalize a code typed or read back by a user
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn sanitize_alphabet(alphabet: &str) -> Result<Vec<char>> {
    let mut chars: Vec<char> = Vec::new();
    for c in alphabet.chars().map(|c| c.to_ascii_uppercase()) {
        if AMBIGUOUS_CHARACTERS.contains(&c) {
            return Err(RollcallError::config(format!(
                "Access code alphabet must not contain ambiguous character '{}'",
                c
            )));
        }
        if !c.is_ascii_alphanumeric() {
            return Err(RollcallError::config(format!(
                "Access code alphabet contains unsupported character '{}'",
                c
            )));
        }
        if !chars.contains(&c) {
            chars.push(c);
        }
    }

    if chars.len() < 2 {
        return Err(RollcallError::config(
            "Access code alphabet needs at least two distinct characters",
        ));
    }
    Ok(chars)
}
