use clap::{Parser, ValueEnum};
use dime_signet::{Keychain, Signet};
use dime_types::dime::{KeysKind, SignetKind};
use dime_types::error::SignetError;
use dime_types::fields::{org_fid, user_fid};
use dime_types::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Kind of signet to generate.
    #[clap(long, value_enum)]
    pub kind: KindArg,

    /// Output path for the signet PEM file.
    #[clap(long = "out")]
    pub out: PathBuf,

    /// Output path for the private keychain PEM file.
    #[clap(long = "keychain")]
    pub keychain: PathBuf,

    /// Signet identifier; organizational signets are carried through the
    /// full and identifiable stages when set.
    #[clap(long)]
    pub id: Option<String>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum KindArg {
    Org,
    User,
    Ssr,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    log::debug!("generating a {:?} signet", args.kind);
    let (keys_kind, signet_kind) = match args.kind {
        KindArg::Org => (KeysKind::Org, SignetKind::Org),
        KindArg::User => (KeysKind::User, SignetKind::User),
        KindArg::Ssr => (KeysKind::User, SignetKind::Ssr),
    };

    let keychain = Keychain::generate(keys_kind)?;
    let mut signet = Signet::new(signet_kind);

    match signet_kind {
        SignetKind::Org => {
            signet.set_field(org_fid::POK, &keychain.signing().public_bytes())?;
            signet.set_field(org_fid::ENC_KEY, &keychain.encryption().public_bytes())?;
            signet.sign_crypto(keychain.signing())?;
            if let Some(id) = &args.id {
                signet.sign_full(keychain.signing())?;
                signet.sign_id(id.as_bytes(), keychain.signing())?;
            }
        }
        SignetKind::User | SignetKind::Ssr => {
            if args.id.is_some() {
                return Err(SignetError::BadParam(
                    "only the issuing organization assigns identifiers; \
                     use `dime sign` for user signets"
                        .into(),
                ));
            }
            signet.set_field(user_fid::SIGN_KEY, &keychain.signing().public_bytes())?;
            signet.set_field(user_fid::ENC_KEY, &keychain.encryption().public_bytes())?;
            signet.sign_ssr(keychain.signing())?;
        }
    }

    keychain.to_file(&args.keychain)?;
    signet.to_file(&args.out)?;

    println!("wrote {}", args.out.display());
    println!("wrote {}", args.keychain.display());
    println!(
        "signing key: {}",
        hex::encode(keychain.signing().public_bytes())
    );
    println!(
        "encryption key: {}",
        hex::encode(keychain.encryption().public_bytes())
    );
    Ok(())
}
