//! ASCII armor for detached signatures and exported public keys.
//!
//! Ciphertext and the sealed private key use age's own armor; this module
//! covers the remaining binary values that travel as text, as PEM blocks.

/// Wraps `bytes` in a `-----BEGIN {label}-----` PEM block.
pub fn armor(label: &str, bytes: &[u8]) -> String {
    let pem = pem::Pem::new(label, bytes);
    pem::encode(&pem)
}

/// Extracts the bytes from an armored block with the given label.
///
/// Returns `None` when the block is malformed or its tag is not `label`.
pub fn dearmor(label: &str, text: &str) -> Option<Vec<u8>> {
    let pem = pem::parse(text).ok()?;
    if pem.tag() != label {
        return None;
    }
    Some(pem.into_contents())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_wraps_long_bodies() {
        let bytes = vec![7u8; 200];
        let armored = armor("TEST BLOCK", &bytes);

        assert!(armored.starts_with("-----BEGIN TEST BLOCK-----"));
        assert!(armored.trim_end().ends_with("-----END TEST BLOCK-----"));
        assert!(armored.lines().count() > 3);
        for line in armored.lines() {
            assert!(line.trim_end().len() <= 64 || line.starts_with("-----"));
        }
        assert_eq!(dearmor("TEST BLOCK", &armored), Some(bytes));
    }

    #[test]
    fn test_dearmor_tolerates_surrounding_whitespace() {
        let armored = format!("\n\n{}  \n", armor("TEST BLOCK", b"hello"));
        assert_eq!(dearmor("TEST BLOCK", &armored), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_dearmor_rejects_wrong_label() {
        let armored = armor("TEST BLOCK", b"hello");
        assert_eq!(dearmor("OTHER BLOCK", &armored), None);
    }

    #[test]
    fn test_dearmor_rejects_truncated_block() {
        let armored = armor("TEST BLOCK", b"hello");
        let truncated: String = armored.lines().take(2).collect::<Vec<_>>().join("\n");
        assert_eq!(dearmor("TEST BLOCK", &truncated), None);
    }

    #[test]
    fn test_dearmor_rejects_invalid_base64() {
        let text = "-----BEGIN TEST BLOCK-----\n!!!!\n-----END TEST BLOCK-----\n";
        assert_eq!(dearmor("TEST BLOCK", text), None);
    }
}
