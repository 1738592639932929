use std::fmt;
use std::str::FromStr;

/// Public key algorithms accepted into `authorized_keys`.
///
/// Anything else in the first column (options such as `command=...`,
/// `ssh-dss`, certificates, garbage) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Rsa,
    Ed25519,
    EcdsaP256,
    EcdsaP384,
    EcdsaP521,
}

impl KeyType {
    pub const ALL: [KeyType; 5] = [
        KeyType::Rsa,
        KeyType::Ed25519,
        KeyType::EcdsaP256,
        KeyType::EcdsaP384,
        KeyType::EcdsaP521,
    ];

    /// The token as it appears in the first column of a key line.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Rsa => "ssh-rsa",
            KeyType::Ed25519 => "ssh-ed25519",
            KeyType::EcdsaP256 => "ecdsa-sha2-nistp256",
            KeyType::EcdsaP384 => "ecdsa-sha2-nistp384",
            KeyType::EcdsaP521 => "ecdsa-sha2-nistp521",
        }
    }

    /// Classify a line by its first whitespace-delimited token.
    pub fn of_line(line: &str) -> Option<Self> {
        line.split_whitespace().next()?.parse().ok()
    }
}

impl FromStr for KeyType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        KeyType::ALL
            .into_iter()
            .find(|kt| kt.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
