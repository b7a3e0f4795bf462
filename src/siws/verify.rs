//! Ed25519 signature verification for sign-in messages.
//!
//! Verification is a yes/no answer. Undecodable signatures, undecodable
//! addresses and wrong lengths are all just `false`.

use solana_signature::Signature;
use tracing::debug;

use crate::shared::WalletAddress;
use crate::siws::SignInMessage;

/// Checks a signature over message bytes against a claimed wallet address.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &[u8], signature: &str, address: &WalletAddress) -> bool;
}

/// Verifies base58 ed25519 signatures against base58 Solana addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &str, address: &WalletAddress) -> bool {
        verify_signature(message, signature, address)
    }
}

/// Decode a base58 signature into its 64-byte form.
pub fn decode_signature(signature_bs58: &str) -> Option<Signature> {
    signature_bs58.parse::<Signature>().ok()
}

/// Verify `signature_bs58` over `message` for the key encoded in `address`.
pub fn verify_signature(message: &[u8], signature_bs58: &str, address: &WalletAddress) -> bool {
    let pubkey = match address.to_pubkey() {
        Ok(pk) => pk,
        Err(e) => {
            debug!(error = %e, "claimed address is not an ed25519 public key");
            return false;
        }
    };
    let Some(signature) = decode_signature(signature_bs58) else {
        debug!("signature is not 64 bytes of base58");
        return false;
    };
    signature.verify(pubkey.as_ref(), message)
}

impl SignInMessage {
    /// Verify a signature over this message's canonical text.
    pub fn verify_with<V: SignatureVerifier + ?Sized>(&self, verifier: &V, signature: &str) -> bool {
        verifier.verify(&self.signing_bytes(), signature, &self.address)
    }
}
