use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, error, info};

use toy_asym::{
    config::{HarnessConfig, KemConfig, ModulusSizing, RsaConfig},
    harness::{self, HarnessError},
    kem::{Kem, KemBackend},
    rsa::RsaError,
};

#[derive(Parser)]
#[command(name = "quantum-demo")]
#[command(about = "Break toy RSA by factoring and sample KEM keys (simulation only)")]
#[command(version)]
struct Cli {
    /// Message to encrypt
    #[arg(long, default_value = "Quantum?")]
    message: String,

    /// Width of each RSA prime
    #[arg(long, default_value_t = 16)]
    prime_bits: u64,

    /// How the modulus relates to the message
    #[arg(long, value_enum, default_value_t = Sizing::Preserve)]
    sizing: Sizing,

    /// Extra modulus bits over the message when `--sizing fit`
    #[arg(long, default_value_t = 2)]
    margin_bits: u64,

    /// Random guesses made against the KEM secret
    #[arg(long, default_value_t = 10_000)]
    attempts: u64,

    /// Assumed attacker speed for the full search estimate
    #[arg(long, default_value_t = 1e7)]
    ops_per_second: f64,

    /// Skip the AES-GCM step
    #[arg(long)]
    no_aead: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Sizing {
    /// Keep the prime width, reject messages that do not fit
    Preserve,
    /// Widen the primes to fit the message
    Fit,
}

impl Cli {
    fn config(&self) -> HarnessConfig {
        let sizing = match self.sizing {
            Sizing::Preserve => ModulusSizing::Preserve,
            Sizing::Fit => ModulusSizing::FitMessage {
                margin_bits: self.margin_bits,
            },
        };
        HarnessConfig {
            message: self.message.as_bytes().to_vec(),
            rsa: RsaConfig {
                prime_bits: self.prime_bits,
                sizing,
                ..RsaConfig::default()
            },
            kem: KemConfig {
                attempts: self.attempts,
                ops_per_second: self.ops_per_second,
                ..KemConfig::default()
            },
            aead_available: !self.no_aead,
        }
    }
}

/// No native KEM library is linked into this build.
fn probe_native_kem() -> Option<Box<dyn Kem>> {
    debug!("probing for a native KEM backend");
    None
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config();
    let kem = KemBackend::select(probe_native_kem());

    info!("RSA toy demo (simulation only)");
    match harness::run_rsa(&config) {
        Ok(report) => info!("\n{}", report),
        Err(HarnessError::Rsa(err @ RsaError::MessageTooLarge { .. })) => {
            error!("{}; use a shorter message or --sizing fit", err)
        }
        Err(err) => return Err(err.into()),
    }

    info!("KEM demo (simulation only)");
    let report = harness::run_kem(&config, &kem)?;
    info!("\n{}", report);
    Ok(())
}
