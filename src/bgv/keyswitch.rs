use crate::error::{LabheError, Result};
use crate::bgv::BgvCiphertext;
use crate::bgv::keygen::{KeySwitchKey, RelinKey};
use crate::ring::rns::RnsPoly;

/// Key-switch a polynomial: decompose into its per-prime residues and
/// pair each digit with the matching gadget row.
///
/// With digit_i = [x]_{q_i} and row i encrypting u_i·src (u_i the CRT
/// unit of prime i), Σ_i digit_i·row_i is an encryption of x·src: modulo
/// q_j the sum collapses to digit_j·src = x·src. The non-negative residue
/// lift keeps each digit below q_i, so the switching noise stays under
/// ℓ·N·q_max·t·σ.
pub fn key_switch(poly: &RnsPoly, ksk: &KeySwitchKey) -> Result<(RnsPoly, RnsPoly)> {
    let basis = &ksk.params.ct_basis;
    if ksk.keys.len() != poly.num_components() {
        return Err(LabheError::DimensionMismatch {
            expected: ksk.keys.len(),
            got: poly.num_components(),
        });
    }

    let mut acc0 = RnsPoly::zero(basis);
    let mut acc1 = RnsPoly::zero(basis);

    for (i, (ks0, ks1)) in ksk.keys.iter().enumerate() {
        let digit = poly.components[i].to_coeff_poly();
        let digit_rns = RnsPoly::from_coeff_poly(&digit, basis)?;
        acc0 = acc0.add(&digit_rns.mul(ks0)?)?;
        acc1 = acc1.add(&digit_rns.mul(ks1)?)?;
    }

    Ok((acc0, acc1))
}

/// Relinearize a degree-2 ciphertext (c0, c1, c2) to degree-1 (c0', c1').
///
/// The s² term is eliminated by switching c2 through the relinearization
/// key:
///   c0' = c0 + Σ_i digit_i(c2) · rlk0_i
///   c1' = c1 + Σ_i digit_i(c2) · rlk1_i
pub fn relinearize(
    ct: &BgvCiphertext,
    rlk: &RelinKey,
) -> Result<BgvCiphertext> {
    if ct.c.len() < 3 {
        return Ok(ct.clone()); // Already degree-1
    }
    if ct.c.len() > 3 {
        return Err(LabheError::InvalidParam(
            "relinearization only supports degree-2 ciphertexts".into()
        ));
    }

    let (d0, d1) = key_switch(&ct.c[2], &rlk.ksk)?;
    let c0 = ct.c[0].add(&d0)?;
    let c1 = ct.c[1].add(&d1)?;

    Ok(BgvCiphertext {
        c: vec![c0, c1],
        params: ct.params.clone(),
    })
}

/// Switch a degree-1 ciphertext through an arbitrary key-switch key
/// whose source secret is the key the c1 component currently pairs with:
///   (c0 + d0, d1)  where (d0, d1) = key_switch(c1).
///
/// Used for cross-key re-encryption; the automorphism path composes the
/// same step with the coefficient permutation.
pub fn switch_ciphertext(
    ct: &BgvCiphertext,
    ksk: &KeySwitchKey,
) -> Result<BgvCiphertext> {
    if ct.c.len() != 2 {
        return Err(LabheError::InvalidParam(
            "key switching requires a degree-1 ciphertext".into()
        ));
    }
    let (d0, d1) = key_switch(&ct.c[1], ksk)?;
    let c0 = ct.c[0].add(&d0)?;

    Ok(BgvCiphertext {
        c: vec![c0, d1],
        params: ct.params.clone(),
    })
}
