//! Verification code issuance and checking for phone login.
//!
//! Codes are six digits, expire after a configurable TTL, and allow a
//! bounded number of attempts. The attempt counter is charged before the
//! code is compared, so an exhausted code fails even when guessed right.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::Mutex;

/// Outcome of a failed verification attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum VerifyError {
    /// No code was ever issued for this phone, or it was already consumed.
    NotFound,
    /// The code expired before it was used.
    Expired,
    /// The attempt budget ran out.
    TooManyAttempts,
    /// Wrong code; `remaining` attempts are left.
    Mismatch { remaining: u32 },
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::NotFound => write!(f, "Please request a verification code first"),
            VerifyError::Expired => {
                write!(f, "Verification code expired, please request a new one")
            }
            VerifyError::TooManyAttempts => {
                write!(f, "Too many attempts, please request a new code")
            }
            VerifyError::Mismatch { remaining } => {
                write!(f, "Incorrect verification code, {} attempts left", remaining)
            }
        }
    }
}

struct CodeRecord {
    code: String,
    expires_at: Instant,
    attempts: u32,
}

/// In-memory verification code table keyed by phone number.
pub struct VerificationCodes {
    ttl: Duration,
    max_attempts: u32,
    codes: Mutex<HashMap<String, CodeRecord>>,
}

impl VerificationCodes {
    pub fn new(ttl: Duration, max_attempts: u32) -> Self {
        Self {
            ttl,
            max_attempts,
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh six digit code for the phone, replacing any earlier one.
    pub async fn generate(&self, phone: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let mut codes = self.codes.lock().await;
        codes.insert(
            phone.to_string(),
            CodeRecord {
                code: code.clone(),
                expires_at: Instant::now() + self.ttl,
                attempts: 0,
            },
        );
        code
    }

    /// Checks a submitted code. Success consumes the record; expiry and
    /// exhaustion delete it too, so a retry needs a fresh code.
    pub async fn verify(&self, phone: &str, submitted: &str) -> Result<(), VerifyError> {
        let mut codes = self.codes.lock().await;
        let record = match codes.get_mut(phone) {
            Some(record) => record,
            None => return Err(VerifyError::NotFound),
        };

        if Instant::now() >= record.expires_at {
            codes.remove(phone);
            return Err(VerifyError::Expired);
        }

        record.attempts += 1;
        if record.attempts > self.max_attempts {
            codes.remove(phone);
            return Err(VerifyError::TooManyAttempts);
        }

        if record.code != submitted {
            let remaining = self.max_attempts - record.attempts;
            return Err(VerifyError::Mismatch { remaining });
        }

        codes.remove(phone);
        Ok(())
    }

    /// Drops expired records. Called from the periodic cleanup task.
    pub async fn cleanup(&self) -> usize {
        let mut codes = self.codes.lock().await;
        let now = Instant::now();
        let before = codes.len();
        codes.retain(|_, record| record.expires_at > now);
        before - codes.len()
    }
}
