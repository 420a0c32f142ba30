use crate::models::ServiceError;
use bcrypt::{hash, verify};
use log::error;

pub mod scheduler;
pub mod team_storage;

// Password utility functions
pub mod password {
    use super::*;
    use rand::Rng;

    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    pub const VIEWER_PASSWORD_LEN: usize = 8;
    pub const ADMIN_PASSWORD_LEN: usize = 10;

    // Random uppercase/digit password, each character drawn uniformly
    pub fn generate(len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }

    // Hash a password using bcrypt
    pub fn hash_password(password: &str, cost: u32) -> Result<String, ServiceError> {
        hash(password, cost).map_err(|e| {
            error!("❌ Failed to hash password: {:?}", e);
            ServiceError::Internal("Failed to store password".to_string())
        })
    }

    // Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|e| {
            error!("❌ Failed to verify password: {:?}", e);
            ServiceError::Internal("Failed to verify password".to_string())
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn generated_passwords_use_the_alphabet() {
            let viewer = generate(VIEWER_PASSWORD_LEN);
            let admin = generate(ADMIN_PASSWORD_LEN);

            assert_eq!(viewer.len(), 8);
            assert_eq!(admin.len(), 10);
            assert!(admin.bytes().all(|b| ALPHABET.contains(&b)));
            assert_eq!(generate(40).len(), 40);
        }

        #[test]
        fn every_position_covers_the_whole_alphabet() {
            let passwords: Vec<String> = (0..5000).map(|_| generate(VIEWER_PASSWORD_LEN)).collect();

            for position in 0..VIEWER_PASSWORD_LEN {
                let seen: std::collections::HashSet<u8> =
                    passwords.iter().map(|p| p.as_bytes()[position]).collect();
                assert_eq!(seen.len(), ALPHABET.len(), "position {}", position);
            }
        }

        #[test]
        fn hash_round_trip() {
            let hashed = hash_password("ABCDEFGHIJ", 4).unwrap();
            assert!(verify_password("ABCDEFGHIJ", &hashed).unwrap());
            assert!(!verify_password("ABCDEFGHIK", &hashed).unwrap());
        }
    }
}
