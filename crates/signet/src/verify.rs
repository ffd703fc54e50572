//! Signet state classification and chain-of-custody verification.
//!
//! The classifier walks the signature fields in canonical order (COC, SSR,
//! CRYPTO, FULL, ID), reconstructing for each the covered payload prefix and
//! verifying it under the appropriate key. Each signature covers every field
//! record with id strictly below its own id, so the cascade at any stage
//! also attests the signatures of the stages beneath it.

use crate::signet::Signet;
use dime_crypto::SigningPublicKey;
use dime_types::dime::{SignetKind, SIGNET_MAX_SIZE};
use dime_types::error::SignetError;
use dime_types::fields::{field_keys, org_fid, user_fid};
use dime_types::state::SignetState;
use dime_types::Result;

impl Signet {
    /// The primary organizational signing key embedded in an org signet.
    pub fn pok(&self) -> Result<SigningPublicKey> {
        if self.kind() != SignetKind::Org {
            return Err(SignetError::BadParam(
                "only organizational signets carry a POK".into(),
            ));
        }
        let bytes = self.get_field(org_fid::POK).ok_or_else(|| {
            SignetError::Incomplete("Primary-Organizational-Key is not present".into())
        })?;
        SigningPublicKey::from_bytes(bytes).map_err(|e| SignetError::Crypto(e.to_string()))
    }

    /// Classifies this signet, verifying its signature cascade.
    ///
    /// `org_pok` is the issuing organization's primary signing key, required
    /// to lift a user signet past the SSR stage; organizational signets
    /// verify against their own embedded POK and ignore it. When
    /// `previous_sign_key` is absent, a chain-of-custody signature is
    /// checked against the signet's own signing key.
    pub fn full_verify(
        &self,
        org_pok: Option<&SigningPublicKey>,
        previous_sign_key: Option<&SigningPublicKey>,
    ) -> SignetState {
        if let Some(missing) = self.missing_required_field() {
            log::debug!("signet incomplete: field {} absent", missing);
            return SignetState::Incomplete;
        }
        match self.kind() {
            SignetKind::Org => self.verify_org_cascade(),
            SignetKind::User | SignetKind::Ssr => {
                self.verify_user_cascade(org_pok, previous_sign_key)
            }
        }
    }

    fn verify_org_cascade(&self) -> SignetState {
        let pok = match self
            .get_field(org_fid::POK)
            .and_then(|b| SigningPublicKey::from_bytes(b).ok())
        {
            Some(key) => key,
            None => return SignetState::Invalid,
        };

        if !self.signature_verifies(org_fid::CRYPTO_SIG, &pok) {
            return SignetState::Invalid;
        }
        self.verify_upper_stages(SignetState::Crypto, &pok)
    }

    fn verify_user_cascade(
        &self,
        org_pok: Option<&SigningPublicKey>,
        previous_sign_key: Option<&SigningPublicKey>,
    ) -> SignetState {
        let own = match self
            .get_field(user_fid::SIGN_KEY)
            .and_then(|b| SigningPublicKey::from_bytes(b).ok())
        {
            Some(key) => key,
            None => return SignetState::Invalid,
        };

        if self.get_field(user_fid::COC_SIG).is_some() {
            let coc_key = previous_sign_key.unwrap_or(&own);
            if !self.signature_verifies(user_fid::COC_SIG, coc_key) {
                return SignetState::BrokenCoc;
            }
        }

        if !self.signature_verifies(user_fid::SSR_SIG, &own) {
            return SignetState::Invalid;
        }
        if self.kind() == SignetKind::Ssr {
            return SignetState::Ssr;
        }

        // Organizational countersignatures require the issuing POK; without
        // one the signet cannot be lifted past the SSR stage.
        let pok = match org_pok {
            Some(pok) => pok,
            None => return SignetState::Ssr,
        };
        if self.get_field(user_fid::CRYPTO_SIG).is_none() {
            return SignetState::Ssr;
        }
        if !self.signature_verifies(user_fid::CRYPTO_SIG, pok) {
            return SignetState::Invalid;
        }
        self.verify_upper_stages(SignetState::Crypto, pok)
    }

    /// Walks FULL_SIG and ID_SIG; ids 253 and 255 are shared by the org and
    /// user catalogs.
    fn verify_upper_stages(&self, floor: SignetState, pok: &SigningPublicKey) -> SignetState {
        if self.get_field(org_fid::FULL_SIG).is_none() {
            return floor;
        }
        if !self.signature_verifies(org_fid::FULL_SIG, pok) {
            return SignetState::Invalid;
        }

        let has_id = self.get_field(org_fid::ID).is_some();
        match self.get_field(org_fid::ID_SIG) {
            None => SignetState::Full,
            Some(_) if !self.signature_verifies(org_fid::ID_SIG, pok) => SignetState::Invalid,
            Some(_) if has_id => SignetState::Id,
            Some(_) => SignetState::Full,
        }
    }

    fn signature_verifies(&self, sig_id: u8, key: &SigningPublicKey) -> bool {
        let signature = match self.get_field(sig_id) {
            Some(bytes) => bytes,
            None => return false,
        };
        let digest = match self.fingerprint(sig_id) {
            Ok(digest) => digest,
            Err(err) => {
                log::warn!("fingerprint at cutoff {} failed: {}", sig_id, err);
                return false;
            }
        };
        key.verify(&digest, signature).is_ok()
    }

    fn missing_required_field(&self) -> Option<u8> {
        field_keys(self.kind())
            .iter()
            .enumerate()
            .find(|(id, entry)| {
                entry
                    .as_ref()
                    .is_some_and(|key| key.required && self.get_field(*id as u8).is_none())
            })
            .map(|(id, _)| id as u8)
    }
}

/// Classifies a raw byte buffer, folding parse failures into the state
/// lattice: oversize buffers are `Overflow`, all other structural failures
/// are `Malformed`.
pub fn classify(
    bytes: &[u8],
    org_pok: Option<&SigningPublicKey>,
    previous_sign_key: Option<&SigningPublicKey>,
) -> SignetState {
    if bytes.len() > SIGNET_MAX_SIZE {
        return SignetState::Overflow;
    }
    match Signet::parse(bytes) {
        Ok(signet) => signet.full_verify(org_pok, previous_sign_key),
        Err(err) => {
            log::debug!("classification failed at parse: {}", err);
            SignetState::Malformed
        }
    }
}

/// Verifies the chain of custody between two successive user signets.
///
/// `next` must carry a COC signature that verifies under `previous`'s
/// signing key, and both signets' organizational cascades must verify under
/// the same `org_pok`. On success the returned state is `next`'s
/// classification; every failure collapses to `BrokenCoc`.
pub fn verify_chain_of_custody(
    previous: &Signet,
    next: &Signet,
    org_pok: &SigningPublicKey,
) -> SignetState {
    if previous.kind() != SignetKind::User || next.kind() != SignetKind::User {
        return SignetState::Malformed;
    }
    if next.get_field(user_fid::COC_SIG).is_none() {
        return SignetState::BrokenCoc;
    }

    let previous_key = match previous
        .get_field(user_fid::SIGN_KEY)
        .and_then(|b| SigningPublicKey::from_bytes(b).ok())
    {
        Some(key) => key,
        None => return SignetState::BrokenCoc,
    };

    // The predecessor must itself be anchored to the supplied organization.
    if previous.full_verify(Some(org_pok), None) < SignetState::Crypto {
        return SignetState::BrokenCoc;
    }

    let state = next.full_verify(Some(org_pok), Some(&previous_key));
    if state >= SignetState::Crypto {
        state
    } else {
        SignetState::BrokenCoc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dime_crypto::{EncryptionKeyPair, SigningKeyPair};
    use dime_types::fields::ssr_fid;

    struct Org {
        signet: Signet,
        sign: SigningKeyPair,
    }

    fn build_org() -> Org {
        let sign = SigningKeyPair::generate().unwrap();
        let enc = EncryptionKeyPair::generate().unwrap();
        let mut signet = Signet::new(SignetKind::Org);
        signet.set_field(org_fid::POK, &sign.public_bytes()).unwrap();
        signet.set_field(org_fid::ENC_KEY, &enc.public_bytes()).unwrap();
        signet.sign_crypto(&sign).unwrap();
        Org { signet, sign }
    }

    fn build_user(org: &Org) -> (Signet, SigningKeyPair) {
        let sign = SigningKeyPair::generate().unwrap();
        let enc = EncryptionKeyPair::generate().unwrap();
        let mut signet = Signet::new(SignetKind::User);
        signet.set_field(user_fid::SIGN_KEY, &sign.public_bytes()).unwrap();
        signet.set_field(user_fid::ENC_KEY, &enc.public_bytes()).unwrap();
        signet.sign_ssr(&sign).unwrap();
        signet.sign_crypto(&org.sign).unwrap();
        (signet, sign)
    }

    #[test]
    fn org_without_crypto_sig_is_incomplete() {
        let sign = SigningKeyPair::generate().unwrap();
        let enc = EncryptionKeyPair::generate().unwrap();
        let mut signet = Signet::new(SignetKind::Org);
        signet.set_field(org_fid::POK, &sign.public_bytes()).unwrap();
        signet.set_field(org_fid::ENC_KEY, &enc.public_bytes()).unwrap();
        assert_eq!(signet.full_verify(None, None), SignetState::Incomplete);
    }

    #[test]
    fn org_cascade_climbs_the_lattice() {
        let mut org = build_org();
        assert_eq!(org.signet.full_verify(None, None), SignetState::Crypto);

        org.signet.set_field(org_fid::NAME, b"Example Postal Service").unwrap();
        let sign = org.sign.clone();
        org.signet.sign_full(&sign).unwrap();
        assert_eq!(org.signet.full_verify(None, None), SignetState::Full);

        org.signet.sign_id(b"example.tld", &sign).unwrap();
        assert_eq!(org.signet.full_verify(None, None), SignetState::Id);
    }

    #[test]
    fn tampered_name_invalidates_full_signet() {
        let mut org = build_org();
        org.signet.set_field(org_fid::NAME, b"Example Postal Service").unwrap();
        let sign = org.sign.clone();
        org.signet.sign_full(&sign).unwrap();
        assert_eq!(org.signet.full_verify(None, None), SignetState::Full);

        // Flip one byte inside the NAME field and reclassify.
        let mut bytes = org.signet.serialize();
        let name_at = bytes
            .windows(b"Example".len())
            .position(|w| w == b"Example")
            .unwrap();
        bytes[name_at] ^= 0x01;
        let tampered = Signet::parse(&bytes).unwrap();
        assert_eq!(tampered.full_verify(None, None), SignetState::Invalid);
    }

    #[test]
    fn minimal_ssr_classifies() {
        let sign = SigningKeyPair::generate().unwrap();
        let enc = EncryptionKeyPair::generate().unwrap();
        let mut ssr = Signet::new(SignetKind::Ssr);
        ssr.set_field(ssr_fid::SIGN_KEY, &sign.public_bytes()).unwrap();
        ssr.set_field(ssr_fid::ENC_KEY, &enc.public_bytes()).unwrap();
        ssr.sign_ssr(&sign).unwrap();
        assert_eq!(ssr.full_verify(None, None), SignetState::Ssr);

        // A corrupted self-signature is Invalid, not Ssr.
        let mut bytes = ssr.serialize();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert_eq!(classify(&bytes, None, None), SignetState::Invalid);
    }

    #[test]
    fn user_signet_needs_the_org_pok_to_advance() {
        let org = build_org();
        let (user, _) = build_user(&org);
        assert_eq!(user.full_verify(None, None), SignetState::Ssr);
        assert_eq!(
            user.full_verify(Some(&org.sign.public()), None),
            SignetState::Crypto
        );
        // The wrong organization's key cannot lift it.
        let stranger = SigningKeyPair::generate().unwrap();
        assert_eq!(
            user.full_verify(Some(&stranger.public()), None),
            SignetState::Invalid
        );
    }

    #[test]
    fn user_cascade_reaches_id() {
        let org = build_org();
        let (mut user, _) = build_user(&org);
        user.sign_full(&org.sign).unwrap();
        user.sign_id(b"nils@example.tld", &org.sign).unwrap();
        assert_eq!(
            user.full_verify(Some(&org.sign.public()), None),
            SignetState::Id
        );
    }

    #[test]
    fn secondary_keys_are_covered_by_the_cascade() {
        use dime_types::fields::{Sok, SokPermissions};

        let sign = SigningKeyPair::generate().unwrap();
        let enc = EncryptionKeyPair::generate().unwrap();
        let delegate = SigningKeyPair::generate().unwrap();
        let mut delegate_key = [0u8; 32];
        delegate_key.copy_from_slice(&delegate.public_bytes());

        let mut signet = Signet::new(SignetKind::Org);
        signet.set_field(org_fid::POK, &sign.public_bytes()).unwrap();
        signet
            .add_sok(&Sok {
                permissions: SokPermissions::MSG | SokPermissions::TLS,
                key: delegate_key,
            })
            .unwrap();
        signet.set_field(org_fid::ENC_KEY, &enc.public_bytes()).unwrap();
        signet.sign_crypto(&sign).unwrap();
        assert_eq!(signet.full_verify(None, None), SignetState::Crypto);
        assert_eq!(signet.soks().unwrap().len(), 1);

        // The SOK sits below the CRYPTO_SIG cutoff, so tampering with its
        // permission byte breaks the signature.
        let mut bytes = signet.serialize();
        let sok_at = bytes
            .windows(33)
            .position(|w| w[1..] == delegate_key)
            .unwrap();
        bytes[sok_at] ^= 0x08;
        let tampered = Signet::parse(&bytes).unwrap();
        assert_eq!(tampered.full_verify(None, None), SignetState::Invalid);
    }

    #[test]
    fn classify_folds_structural_failures() {
        assert_eq!(classify(&[0xFF, 0xFF, 0, 0, 0], None, None), SignetState::Malformed);
        assert_eq!(classify(&[], None, None), SignetState::Malformed);
    }

    #[test]
    fn chain_of_custody_accepts_a_proper_rotation() {
        let org = build_org();
        let (first, first_sign) = build_user(&org);

        let new_sign = SigningKeyPair::generate().unwrap();
        let new_enc = EncryptionKeyPair::generate().unwrap();
        let mut second = Signet::new(SignetKind::User);
        second.set_field(user_fid::SIGN_KEY, &new_sign.public_bytes()).unwrap();
        second.set_field(user_fid::ENC_KEY, &new_enc.public_bytes()).unwrap();
        second.sign_coc(&first_sign).unwrap();
        second.sign_ssr(&new_sign).unwrap();
        second.sign_crypto(&org.sign).unwrap();

        assert_eq!(
            verify_chain_of_custody(&first, &second, &org.sign.public()),
            SignetState::Crypto
        );
    }

    #[test]
    fn chain_of_custody_rejects_an_org_rotation() {
        let org = build_org();
        let other_org = build_org();
        let (first, first_sign) = build_user(&org);

        let new_sign = SigningKeyPair::generate().unwrap();
        let new_enc = EncryptionKeyPair::generate().unwrap();
        let mut second = Signet::new(SignetKind::User);
        second.set_field(user_fid::SIGN_KEY, &new_sign.public_bytes()).unwrap();
        second.set_field(user_fid::ENC_KEY, &new_enc.public_bytes()).unwrap();
        second.sign_coc(&first_sign).unwrap();
        second.sign_ssr(&new_sign).unwrap();
        // Countersigned by a different organization than the predecessor.
        second.sign_crypto(&other_org.sign).unwrap();

        assert_eq!(
            verify_chain_of_custody(&first, &second, &org.sign.public()),
            SignetState::BrokenCoc
        );
    }

    #[test]
    fn chain_of_custody_rejects_a_forged_link() {
        let org = build_org();
        let (first, _) = build_user(&org);
        let (mut second, second_sign) = build_user(&org);

        // COC signed by an unrelated key rather than first's signing key.
        let forger = SigningKeyPair::generate().unwrap();
        second.remove_field(user_fid::SSR_SIG, 0).unwrap();
        second.remove_field(user_fid::CRYPTO_SIG, 0).unwrap();
        second.sign_coc(&forger).unwrap();
        second.sign_ssr(&second_sign).unwrap();
        second.sign_crypto(&org.sign).unwrap();

        assert_eq!(
            verify_chain_of_custody(&first, &second, &org.sign.public()),
            SignetState::BrokenCoc
        );
    }

    #[test]
    fn chain_of_custody_requires_the_link() {
        let org = build_org();
        let (first, _) = build_user(&org);
        let (second, _) = build_user(&org);
        assert_eq!(
            verify_chain_of_custody(&first, &second, &org.sign.public()),
            SignetState::BrokenCoc
        );
    }

    #[test]
    fn verified_full_state_is_monotonic() {
        let org = build_org();
        let (mut user, _) = build_user(&org);
        user.sign_full(&org.sign).unwrap();
        let pok = org.sign.public();

        let first = user.full_verify(Some(&pok), None);
        assert_eq!(first, SignetState::Full);
        // Reclassification under the same POK never drops below FULL.
        let second = Signet::parse(&user.serialize())
            .unwrap()
            .full_verify(Some(&pok), None);
        assert!(second >= SignetState::Full);
    }
}
