//! Invitation code generation policy.
//!
//! Codes are fixed-length draws from a fixed pool. Global uniqueness is
//! not this module's job: the repository re-draws on collision and the
//! database unique index is the final backstop.

use rand::Rng;

/// Length of every invitation code.
pub const INVITATION_CODE_LENGTH: usize = 10;

/// Character pool for invitation codes: upper-case letters, digits,
/// `.` and `-`.
pub const INVITATION_CODE_POOL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.-";

/// Draws a random invitation code.
pub fn generate_invitation_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITATION_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..INVITATION_CODE_POOL.len());
            INVITATION_CODE_POOL[idx] as char
        })
        .collect()
}

/// Checks whether a string matches the code policy (length and charset).
pub fn is_valid_code(code: &str) -> bool {
    code.len() == INVITATION_CODE_LENGTH
        && code.bytes().all(|b| INVITATION_CODE_POOL.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_code_matches_policy() {
        for _ in 0..100 {
            let code = generate_invitation_code();
            assert_eq!(code.len(), INVITATION_CODE_LENGTH);
            assert!(is_valid_code(&code), "invalid code: {}", code);
        }
    }

    #[test]
    fn test_generated_codes_mostly_unique() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_invitation_code()).collect();
        // 38^10 possible codes; collisions in a thousand draws would
        // point at a broken RNG.
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("ABC123.-XY"));
        assert!(!is_valid_code("abc123.-xy")); // lowercase
        assert!(!is_valid_code("ABC123")); // too short
        assert!(!is_valid_code("ABC123.-XYZ")); // too long
        assert!(!is_valid_code("ABC 23.-XY")); // space
    }
}
