use crypto::{
    ecc::{hash_to_scalar, Point, Scalar, BASEPOINT_TABLE},
    PublicKey, SecretKey,
};

/// Wrapper around the result (secret key * public key)
///
/// Both sides of an exchange reach the same derivation: the sender from `r` and the
/// recipient's public view key (`rV`), the recipient from its view secret and the
/// transaction mask (`aR`)
pub struct Derivation(pub(crate) Point);

impl Derivation {
    /// Create a new derivation from the given secret and public keys
    pub fn from(scalar: &Scalar, public_key: &PublicKey) -> Option<Self> {
        if !scalar.is_canonical() {
            return None;
        }

        Some(Derivation((scalar * public_key).mul_by_cofactor()))
    }

    /// Convert this derivation into a Scalar
    /// H_s(derivation)
    pub fn to_scalar(&self) -> Scalar {
        hash_to_scalar(self.0.compress().as_bytes())
    }
}

/// One-time public key for a recipient: `H_s(rV)G + S`
///
/// Computed by the sender with its ephemeral secret `r` (its mask is `R = rG`)
pub fn derive_ghost_public_key(
    r: &SecretKey,
    view_public_key: &PublicKey,
    spend_public_key: &PublicKey,
) -> Option<PublicKey> {
    let derivation = Derivation::from(r, view_public_key)?;

    Some(&derivation.to_scalar() * &BASEPOINT_TABLE + spend_public_key)
}

/// One-time secret key for an output: `H_s(aR) + b`
///
/// The result only matches the output key if the output was derived for the account
/// holding `view_secret_key` (`a`) and `spend_secret_key` (`b`)
pub fn derive_ghost_private_key(
    mask: &PublicKey,
    view_secret_key: &SecretKey,
    spend_secret_key: &SecretKey,
) -> Option<SecretKey> {
    let derivation = Derivation::from(view_secret_key, mask)?;

    Some(derivation.to_scalar() + spend_secret_key)
}

/// Recovers the public spend key an output key was derived for: `K - H_s(aR)G`
///
/// Needs only the view secret key, so a watcher can tell which account an output pays
/// without being able to spend it
pub fn view_ghost_output_key(
    key: &PublicKey,
    mask: &PublicKey,
    view_secret_key: &SecretKey,
) -> Option<PublicKey> {
    let derivation = Derivation::from(view_secret_key, mask)?;

    Some(key - &derivation.to_scalar() * &BASEPOINT_TABLE)
}
