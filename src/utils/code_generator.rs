//! Short code generation.
//!
//! Codes are drawn from the OS entropy source over a fixed 62-character
//! alphabet. Each position is sampled independently and uniformly.

/// Characters a short code may contain.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bytes at or above this value are discarded so `b % 62` stays unbiased.
const ACCEPT_BELOW: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Random bytes requested from the OS per round.
const ENTROPY_CHUNK: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    #[error("random source unavailable: {0}")]
    RandomSource(getrandom::Error),

    #[error("short code length must be positive, got {0}")]
    InvalidLength(usize),
}

/// Source of candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a candidate code of exactly `length` characters.
    fn generate(&self, length: usize) -> Result<String, CodeGenError>;
}

/// [`CodeGenerator`] backed by the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> Result<String, CodeGenError> {
        generate_code(length)
    }
}

/// Generates a random short code of `length` characters from [`ALPHABET`].
///
/// # Errors
///
/// Returns [`CodeGenError::InvalidLength`] for a zero length and
/// [`CodeGenError::RandomSource`] if the OS entropy source fails.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(length: usize) -> Result<String, CodeGenError> {
    if length == 0 {
        return Err(CodeGenError::InvalidLength(length));
    }

    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; ENTROPY_CHUNK];

    while code.len() < length {
        getrandom::fill(&mut buffer).map_err(CodeGenError::RandomSource)?;

        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if code.len() == length {
                break;
            }
            code.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
        }
    }

    Ok(code)
}
