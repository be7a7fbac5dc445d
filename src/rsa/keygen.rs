// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use num_traits::One;
use rand::rngs::OsRng;
use tracing::{debug, warn};

use super::bigint::{gcd, mod_pow, totient, RsaBigInt};
use super::inverse::mod_inverse;
use super::primality::is_probable_prime;
use super::random::RandomSource;
use crate::error::{RsaError, RsaResult};

/// Smallest prime size the generator accepts
pub const MIN_PRIME_BITS: u64 = 4;

/// RSA key pair: public exponent, private exponent and modulus.
///
/// The prime factors and the totient never outlive generation.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    e: RsaBigInt,
    d: RsaBigInt,
    n: RsaBigInt,
}

impl RsaKeyPair {
    /// Assemble a keypair from caller-held components (e.g. a custom encoding); `n` must be non-zero.
    /// The components are not checked against each other.
    pub fn from_components(e: RsaBigInt, d: RsaBigInt, n: RsaBigInt) -> Self {
        Self { e, d, n }
    }

    /// Public exponent
    pub fn e(&self) -> &RsaBigInt {
        &self.e
    }

    /// Private exponent
    pub fn d(&self) -> &RsaBigInt {
        &self.d
    }

    /// Modulus
    pub fn n(&self) -> &RsaBigInt {
        &self.n
    }

    /// Get the bit length of the modulus
    pub fn modulus_bits(&self) -> u64 {
        self.n.bits()
    }

    /// m^e mod n
    pub fn encrypt_value(&self, m: &RsaBigInt) -> RsaBigInt {
        mod_pow(m, &self.e, &self.n)
    }

    /// c^d mod n
    pub fn decrypt_value(&self, c: &RsaBigInt) -> RsaBigInt {
        mod_pow(c, &self.d, &self.n)
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("e", &self.e)
            .field("d", &"<redacted>")
            .field("n", &self.n)
            .finish()
    }
}

/// Configuration for key generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub p_bits: u64,
    pub q_bits: u64,
    pub e_bits: u64,
    /// Miller-Rabin rounds per prime candidate
    pub rounds: u32,
    pub max_prime_candidates: u64,
    pub max_exponent_candidates: u64,
    /// Random round trips checked after generation; 0 skips the check
    pub self_check_samples: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        // Unequal prime sizes keep p and q apart; n lands at 199..=200 bits
        Self {
            p_bits: 98,
            q_bits: 102,
            e_bits: 8,
            rounds: 100,
            max_prime_candidates: 100_000,
            max_exponent_candidates: 10_000,
            self_check_samples: 1,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_bits(mut self, p_bits: u64, q_bits: u64) -> Self {
        self.p_bits = p_bits;
        self.q_bits = q_bits;
        self
    }

    pub fn with_exponent_bits(mut self, e_bits: u64) -> Self {
        self.e_bits = e_bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_candidate_limits(mut self, primes: u64, exponents: u64) -> Self {
        self.max_prime_candidates = primes;
        self.max_exponent_candidates = exponents;
        self
    }

    pub fn with_self_check_samples(mut self, samples: u32) -> Self {
        self.self_check_samples = samples;
        self
    }

    /// Reject parameters that can never yield a usable keypair
    pub fn validate(&self) -> RsaResult<()> {
        if self.p_bits < MIN_PRIME_BITS || self.q_bits < MIN_PRIME_BITS {
            return Err(RsaError::InvalidConfig(format!(
                "prime sizes must be at least {} bits (got p={}, q={})",
                MIN_PRIME_BITS, self.p_bits, self.q_bits
            )));
        }
        if self.e_bits < 2 {
            return Err(RsaError::InvalidConfig(format!(
                "e_bits must be at least 2 (got {})",
                self.e_bits
            )));
        }
        // φ has at least p_bits + q_bits - 2 bits; e must stay below it
        let phi_bits = self.p_bits.saturating_add(self.q_bits).saturating_sub(2);
        if self.e_bits >= phi_bits {
            return Err(RsaError::InvalidConfig(format!(
                "e_bits={} must be smaller than the totient ({} bits or more)",
                self.e_bits, phi_bits
            )));
        }
        if self.rounds == 0 {
            return Err(RsaError::InvalidConfig("rounds must be at least 1".to_string()));
        }
        if self.max_prime_candidates == 0 || self.max_exponent_candidates == 0 {
            return Err(RsaError::InvalidConfig("candidate limits must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Candidate counts from one generation run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyGenStats {
    pub p_candidates: u64,
    pub q_candidates: u64,
    pub e_candidates: u64,
}

/// Key generator bound to a configuration
#[derive(Clone, Debug, Default)]
pub struct KeyGenerator {
    config: KeyGenConfig,
}

impl KeyGenerator {
    pub fn new(config: KeyGenConfig) -> RsaResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KeyGenConfig {
        &self.config
    }

    /// Generate a keypair along with the candidate counts it took
    pub fn generate<R>(&self, rng: &mut R) -> RsaResult<(RsaKeyPair, KeyGenStats)>
    where
        R: RandomSource + ?Sized,
    {
        let cfg = &self.config;
        let mut stats = KeyGenStats::default();

        debug!(p_bits = cfg.p_bits, q_bits = cfg.q_bits, e_bits = cfg.e_bits, "generating RSA keypair");

        // p, q and φ stay inside this block and are dropped once n and d exist
        let (n, e, d) = {
            let (p, p_tries) = self.find_prime(cfg.p_bits, None, rng)?;
            let (q, q_tries) = self.find_prime(cfg.q_bits, Some(&p), rng)?;
            stats.p_candidates = p_tries;
            stats.q_candidates = q_tries;

            let n = &p * &q;
            let phi = totient(&p, &q);
            drop((p, q));

            let (e, e_tries) = self.find_exponent(&phi, rng)?;
            stats.e_candidates = e_tries;

            let d = private_exponent(&e, &phi)?;
            (n, e, d)
        };

        let keypair = RsaKeyPair { e, d, n };
        self.self_check(&keypair, rng)?;

        debug!(
            modulus_bits = keypair.modulus_bits(),
            p_candidates = stats.p_candidates,
            q_candidates = stats.q_candidates,
            e_candidates = stats.e_candidates,
            "RSA keypair generated"
        );
        Ok((keypair, stats))
    }

    /// Sample odd `bits`-bit candidates until one passes Miller-Rabin
    fn find_prime<R>(&self, bits: u64, distinct_from: Option<&RsaBigInt>, rng: &mut R) -> RsaResult<(RsaBigInt, u64)>
    where
        R: RandomSource + ?Sized,
    {
        for attempt in 1..=self.config.max_prime_candidates {
            let candidate = rng.next_exact_bits(bits) | RsaBigInt::one();
            if distinct_from == Some(&candidate) {
                continue;
            }
            if is_probable_prime(&candidate, self.config.rounds, rng) {
                return Ok((candidate, attempt));
            }
        }

        warn!(bits, attempts = self.config.max_prime_candidates, "prime search exhausted");
        Err(RsaError::InvalidModulus {
            bits,
            attempts: self.config.max_prime_candidates,
        })
    }

    /// Sample `e_bits`-bit exponents until one is coprime to φ
    fn find_exponent<R>(&self, phi: &RsaBigInt, rng: &mut R) -> RsaResult<(RsaBigInt, u64)>
    where
        R: RandomSource + ?Sized,
    {
        let bits = self.config.e_bits;
        for attempt in 1..=self.config.max_exponent_candidates {
            let e = rng.next_exact_bits(bits);
            if gcd(&e, phi).is_one() {
                return Ok((e, attempt));
            }
        }

        warn!(bits, attempts = self.config.max_exponent_candidates, "public exponent search exhausted");
        Err(RsaError::ExponentSearchExhausted {
            bits,
            attempts: self.config.max_exponent_candidates,
        })
    }

    /// (m^e)^d mod n must give back m for random m < n
    fn self_check<R>(&self, keypair: &RsaKeyPair, rng: &mut R) -> RsaResult<()>
    where
        R: RandomSource + ?Sized,
    {
        for _ in 0..self.config.self_check_samples {
            let m = rng.next_below(&keypair.n);
            if keypair.decrypt_value(&keypair.encrypt_value(&m)) != m {
                warn!(modulus_bits = keypair.modulus_bits(), "keypair self-check failed");
                return Err(RsaError::KeypairSelfCheckFailed);
            }
        }
        Ok(())
    }
}

/// d = e^(-1) mod φ, failing without exposing φ
fn private_exponent(e: &RsaBigInt, phi: &RsaBigInt) -> RsaResult<RsaBigInt> {
    mod_inverse(e, phi).map_err(|_| {
        warn!("public exponent has no inverse modulo the totient");
        RsaError::NoPrivateExponent
    })
}

/// Generate an RSA key pair from primes of `p_bits` and `q_bits` bits and an
/// `e_bits`-bit public exponent, testing primes with `rounds` Miller-Rabin rounds
pub fn generate_keypair<R>(p_bits: u64, q_bits: u64, e_bits: u64, rounds: u32, rng: &mut R) -> RsaResult<RsaKeyPair>
where
    R: RandomSource + ?Sized,
{
    let config = KeyGenConfig::default()
        .with_prime_bits(p_bits, q_bits)
        .with_exponent_bits(e_bits)
        .with_rounds(rounds);
    let (keypair, _) = KeyGenerator::new(config)?.generate(rng)?;
    Ok(keypair)
}

/// Generate RSA key pair with default settings from the operating system's RNG
pub fn generate_default_keypair() -> RsaResult<RsaKeyPair> {
    let (keypair, _) = KeyGenerator::default().generate(&mut OsRng)?;
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_key_generation() {
        let keypair = generate_keypair(98, 102, 8, 40, &mut rng(1)).unwrap();
        let bits = keypair.modulus_bits();
        assert!((199..=200).contains(&bits), "modulus has {} bits", bits);
        assert_eq!(keypair.e().bits(), 8);
        assert!(keypair.d() < keypair.n());
    }

    #[test]
    fn test_key_properties() {
        let mut rng = rng(2);
        for (p_bits, q_bits, e_bits) in [(30u64, 34u64, 5u64), (64, 70, 17), (98, 102, 8), (200, 210, 32)] {
            let keypair = generate_keypair(p_bits, q_bits, e_bits, 30, &mut rng).unwrap();
            assert!(gcd(keypair.e(), keypair.n()).is_one());
            for m in [0u64, 1, 2, 42, 0xdead_beef] {
                let m = from_u64(m) % keypair.n();
                assert_eq!(keypair.decrypt_value(&keypair.encrypt_value(&m)), m);
            }
        }
    }

    #[test]
    fn test_stats_are_counted() {
        let generator = KeyGenerator::new(KeyGenConfig::default().with_rounds(30)).unwrap();
        let (_, stats) = generator.generate(&mut rng(3)).unwrap();
        assert!(stats.p_candidates >= 1);
        assert!(stats.q_candidates >= 1);
        assert!(stats.e_candidates >= 1);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_keypair(64, 70, 16, 20, &mut rng(9)).unwrap();
        let b = generate_keypair(64, 70, 16, 20, &mut rng(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_equal_prime_sizes() {
        let keypair = generate_keypair(8, 8, 5, 20, &mut rng(4)).unwrap();
        let m = from_u64(5) % keypair.n();
        assert_eq!(keypair.decrypt_value(&keypair.encrypt_value(&m)), m);
    }

    #[test]
    fn test_invalid_config() {
        let mut rng = rng(5);
        for (p, q, e, rounds) in [(2u64, 100u64, 8u64, 10u32), (98, 102, 1, 10), (98, 102, 8, 0), (8, 8, 14, 10)] {
            match generate_keypair(p, q, e, rounds, &mut rng) {
                Err(RsaError::InvalidConfig(_)) => {}
                other => panic!("expected InvalidConfig, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_exponent_search_is_bounded() {
        // 2-bit exponents are 2 or 3; 2 never works and 3 fails whenever 3 | φ
        let config = KeyGenConfig::default()
            .with_prime_bits(16, 20)
            .with_exponent_bits(2)
            .with_rounds(20)
            .with_candidate_limits(10_000, 50);
        let generator = KeyGenerator::new(config).unwrap();

        let mut rng = rng(6);
        let mut exhausted = 0;
        for _ in 0..40 {
            match generator.generate(&mut rng) {
                Ok((keypair, _)) => assert_eq!(keypair.e(), &from_u64(3)),
                Err(RsaError::ExponentSearchExhausted { bits, attempts }) => {
                    assert_eq!((bits, attempts), (2, 50));
                    exhausted += 1;
                }
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert!(exhausted > 0);
    }

    #[test]
    fn test_prime_search_is_bounded() {
        let config = KeyGenConfig::default()
            .with_prime_bits(512, 520)
            .with_rounds(10)
            .with_candidate_limits(1, 10);
        let generator = KeyGenerator::new(config).unwrap();

        let mut rng = rng(7);
        let failures = (0..20)
            .filter(|_| matches!(generator.generate(&mut rng), Err(RsaError::InvalidModulus { attempts: 1, .. })))
            .count();
        assert!(failures > 0);
    }

    #[test]
    fn test_private_exponent_failure_hides_totient() {
        let phi = from_u64(3120);
        assert_eq!(private_exponent(&from_u64(17), &phi).unwrap(), from_u64(2753));

        let err = private_exponent(&from_u64(6), &phi).unwrap_err();
        assert!(matches!(err, RsaError::NoPrivateExponent));
        assert!(!format!("{} {:?}", err, err).contains("3120"));
    }

    #[test]
    fn test_self_check_rejects_wrong_private_exponent() {
        let generator = KeyGenerator::new(KeyGenConfig::default().with_self_check_samples(16)).unwrap();
        let broken = RsaKeyPair::from_components(from_u64(17), from_u64(2752), from_u64(3233));
        match generator.self_check(&broken, &mut rng(8)) {
            Err(RsaError::KeypairSelfCheckFailed) => {}
            other => panic!("expected KeypairSelfCheckFailed, got {:?}", other),
        }

        let good = RsaKeyPair::from_components(from_u64(17), from_u64(2753), from_u64(3233));
        assert!(generator.self_check(&good, &mut rng(8)).is_ok());
    }

    #[test]
    fn test_huge_prime_sizes_do_not_overflow_validation() {
        let config = KeyGenConfig::default().with_prime_bits(u64::MAX, u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_private_exponent() {
        let keypair = RsaKeyPair::from_components(from_u64(17), from_u64(2753), from_u64(3233));
        let shown = format!("{:?}", keypair);
        assert!(shown.contains("3233"));
        assert!(!shown.contains("2753"));
    }
}
