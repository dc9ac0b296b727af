//! Keygen command - writes `access_token` and `access_token.pub`

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use crate::infrastructure::auth::{generate_key_pair, write_key_pair, MIN_KEY_BITS};

#[derive(Args, Debug, Clone)]
pub struct KeygenArgs {
    /// Directory the key files are written to
    #[arg(long, default_value = "keys")]
    pub out_dir: PathBuf,

    /// RSA modulus size in bits
    #[arg(long, default_value_t = MIN_KEY_BITS)]
    pub bits: usize,

    /// Replace existing key files
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &KeygenArgs) -> anyhow::Result<()> {
    let (private_path, public_path) = generate(&args.out_dir, args.bits, args.force)?;

    info!(
        private_key = %private_path.display(),
        public_key = %public_path.display(),
        bits = args.bits,
        "Key pair written"
    );

    Ok(())
}

fn generate(dir: &Path, bits: usize, force: bool) -> anyhow::Result<(PathBuf, PathBuf)> {
    let pair = generate_key_pair(bits)?;
    Ok(write_key_pair(&pair, dir, force)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::{load_key_pair, JwtTokenService};

    #[test]
    fn test_generated_keys_load_into_token_service() {
        let dir = tempfile::tempdir().unwrap();

        let (private_path, public_path) = generate(dir.path(), 2048, false).unwrap();
        let pair = load_key_pair(&private_path, &public_path).unwrap();

        assert!(JwtTokenService::from_key_pair(&pair, std::time::Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn test_refuses_small_keys() {
        let dir = tempfile::tempdir().unwrap();
        assert!(generate(dir.path(), 1024, false).is_err());
    }

    #[test]
    fn test_existing_keys_need_force() {
        let dir = tempfile::tempdir().unwrap();
        generate(dir.path(), 2048, false).unwrap();

        assert!(generate(dir.path(), 2048, false).is_err());
        assert!(generate(dir.path(), 2048, true).is_ok());
    }
}
