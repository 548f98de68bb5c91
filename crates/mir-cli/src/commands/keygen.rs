//! Keygen command implementation.

use mir_core::KeyPair;
use serde_json::json;

use crate::output::format_json;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let keypair = KeyPair::generate();
    let public = keypair.public_key();

    let out = json!({
        "privateKey": hex::encode(keypair.to_bytes()),
        "publicKey": public.to_hex(),
        "fingerprint": keypair.fingerprint().as_ref(),
    });

    println!("{}", format_json(&out));
    Ok(())
}
