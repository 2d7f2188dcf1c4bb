use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use thiserror::Error;

/// Returned when `a` has no inverse modulo `m`, i.e. `gcd(a, m) != 1`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{a} has no inverse modulo {m}")]
pub struct NoInverse {
    pub a: BigUint,
    pub m: BigUint,
}

/// Extended Euclidian algorithm.
///
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`.
#[allow(clippy::many_single_char_names)]
pub fn egcd(a: &BigUint, b: &BigUint) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next);

        let next = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next);

        let next = &old_t - q * &t;
        old_t = std::mem::replace(&mut t, next);
    }
    (old_r, old_s, old_t)
}

/// Modular inverse: finds `x` in `[0, m)` with `a*x = 1 (mod m)`.
pub fn modinv(a: &BigUint, m: &BigUint) -> Result<BigUint, NoInverse> {
    let no_inverse = || NoInverse {
        a: a.clone(),
        m: m.clone(),
    };
    if m.is_zero() {
        return Err(no_inverse());
    }
    let (gcd, x, _) = egcd(a, m);
    if !gcd.is_one() {
        return Err(no_inverse());
    }
    // mod_floor by a positive modulus is never negative
    let (_, x) = x.mod_floor(&BigInt::from(m.clone())).into_parts();
    Ok(x)
}

/// Right-to-left square-and-multiply.
///
/// Panics if `modulus` is zero.
pub fn modpow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    assert!(!modulus.is_zero(), "modulus must be non-zero");
    if modulus.is_one() {
        return BigUint::zero();
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    for i in 0..exp.bits() {
        if exp.bit(i) {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
    }
    result
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn egcd_bezout() {
        let (g, x, y) = egcd(&big(240), &big(46));
        assert_eq!(g, BigInt::from(2));
        assert_eq!(BigInt::from(240) * x + BigInt::from(46) * y, g);
    }

    #[test]
    fn egcd_with_zero() {
        let (g, x, y) = egcd(&big(17), &big(0));
        assert_eq!(g, BigInt::from(17));
        assert_eq!(x, BigInt::one());
        assert_eq!(y, BigInt::zero());
    }

    #[test]
    fn modinv_known_values() {
        assert_eq!(modinv(&big(3), &big(11)).unwrap(), big(4));
        assert_eq!(modinv(&big(17), &big(3120)).unwrap(), big(2753));
    }

    #[test]
    fn modinv_fails_when_not_coprime() {
        let err = modinv(&big(6), &big(9)).unwrap_err();
        assert_eq!(err.a, big(6));
        assert_eq!(err.m, big(9));
        modinv(&big(5), &big(0)).unwrap_err();
    }

    #[test]
    fn modpow_matches_num() {
        let base = big(4);
        let exp = big(13);
        let m = big(497);
        assert_eq!(modpow(&base, &exp, &m), big(445));
        assert_eq!(modpow(&base, &exp, &m), base.modpow(&exp, &m));
        assert_eq!(modpow(&big(7), &big(0), &big(13)), big(1));
        assert_eq!(modpow(&big(7), &big(5), &big(1)), big(0));
    }

    #[test]
    #[should_panic]
    fn modpow_zero_modulus() {
        modpow(&big(2), &big(3), &big(0));
    }

    quickcheck! {
        fn modinv_is_inverse(a: u32, m: u32) -> bool {
            let (a, m) = (big(a as u64), big(m as u64 + 2));
            match modinv(&a, &m) {
                Ok(x) => x < m && (&a * x) % &m == BigUint::one(),
                Err(_) => !a.gcd(&m).is_one(),
            }
        }

        fn modpow_agrees_with_num(base: u64, exp: u32, m: u64) -> bool {
            let (base, exp, m) = (big(base), big(exp as u64), big(m.saturating_add(1)));
            modpow(&base, &exp, &m) == base.modpow(&exp, &m)
        }
    }
}
