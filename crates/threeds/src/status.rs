//! Closed enums for the single-letter status codes exchanged with the 3DS server.
//!
//! Raw codes are mapped once at the edge ([`TransStatus::from_code`],
//! [`FingerprintStatus::completion_indicator`]); the flow steps only match on
//! the enums.

use std::fmt;

/// `transStatus` as reported by the ACS / directory server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransStatus {
    /// `Y`: authentication verification successful.
    Authenticated,
    /// `A`: attempts processing performed.
    Attempted,
    /// `C`: challenge required.
    ChallengeRequired,
    /// `N`: not authenticated, transaction denied.
    NotAuthenticated,
    /// `U`: authentication could not be performed.
    Unavailable,
    /// `R`: authentication rejected by the issuer.
    Rejected,
}

impl TransStatus {
    const TABLE: [(&'static str, TransStatus); 6] = [
        ("Y", TransStatus::Authenticated),
        ("A", TransStatus::Attempted),
        ("C", TransStatus::ChallengeRequired),
        ("N", TransStatus::NotAuthenticated),
        ("U", TransStatus::Unavailable),
        ("R", TransStatus::Rejected),
    ];

    /// Map a wire code to its variant. Unknown codes return `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, status)| *status)
    }

    pub fn code(self) -> &'static str {
        match self {
            TransStatus::Authenticated => "Y",
            TransStatus::Attempted => "A",
            TransStatus::ChallengeRequired => "C",
            TransStatus::NotAuthenticated => "N",
            TransStatus::Unavailable => "U",
            TransStatus::Rejected => "R",
        }
    }

    /// `Y` or `A`: the payment may proceed to authorisation.
    pub fn is_authenticated(self) -> bool {
        matches!(self, TransStatus::Authenticated | TransStatus::Attempted)
    }
}

impl fmt::Display for TransStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Completion state of the 3DS Method (device fingerprinting) for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintStatus {
    NotCompleted,
    Completed,
    /// The card range has no 3DS Method URL, so fingerprinting never runs.
    Unavailable,
}

impl FingerprintStatus {
    /// Value of `threeDSCompInd` in the authentication request.
    pub fn completion_indicator(self) -> &'static str {
        match self {
            FingerprintStatus::Completed => "Y",
            FingerprintStatus::NotCompleted => "N",
            FingerprintStatus::Unavailable => "U",
        }
    }

    /// `Completed` and `Unavailable` are terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, FingerprintStatus::NotCompleted)
    }
}

impl fmt::Display for FingerprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.completion_indicator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_maps_back_to_itself() {
        for code in ["Y", "A", "C", "N", "U", "R"] {
            let status = TransStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(TransStatus::from_code(""), None);
        assert_eq!(TransStatus::from_code("y"), None);
        assert_eq!(TransStatus::from_code("D"), None);
        assert_eq!(TransStatus::from_code("YY"), None);
    }

    #[test]
    fn only_y_and_a_are_authenticated() {
        let authenticated: Vec<_> = ["Y", "A", "C", "N", "U", "R"]
            .into_iter()
            .filter_map(TransStatus::from_code)
            .filter(|s| s.is_authenticated())
            .collect();
        assert_eq!(
            authenticated,
            vec![TransStatus::Authenticated, TransStatus::Attempted]
        );
    }

    #[test]
    fn completion_indicators() {
        assert_eq!(FingerprintStatus::Completed.completion_indicator(), "Y");
        assert_eq!(FingerprintStatus::NotCompleted.completion_indicator(), "N");
        assert_eq!(FingerprintStatus::Unavailable.completion_indicator(), "U");
    }

    #[test]
    fn terminal_states() {
        assert!(!FingerprintStatus::NotCompleted.is_terminal());
        assert!(FingerprintStatus::Completed.is_terminal());
        assert!(FingerprintStatus::Unavailable.is_terminal());
    }
}
