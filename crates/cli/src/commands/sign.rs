use clap::{Parser, ValueEnum};
use dime_signet::{Keychain, Signet};
use dime_types::dime::SignetKind;
use dime_types::error::SignetError;
use dime_types::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct SignArgs {
    /// Input signet PEM file.
    #[clap(long = "in")]
    pub input: PathBuf,

    /// Organizational keychain whose signing key countersigns.
    #[clap(long = "org-key")]
    pub org_key: PathBuf,

    /// Output path; the input file is rewritten when omitted.
    #[clap(long = "out")]
    pub out: Option<PathBuf>,

    /// Highest signature stage to apply.
    #[clap(long, value_enum, default_value = "full")]
    pub stage: StageArg,

    /// Signet identifier, required for the id stage.
    #[clap(long)]
    pub id: Option<String>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum StageArg {
    Crypto,
    Full,
    Id,
}

pub fn run(args: SignArgs) -> Result<()> {
    let mut signet = Signet::from_file(&args.input)?;
    if signet.kind() == SignetKind::Ssr {
        return Err(SignetError::BadParam(
            "signing requests carry no organizational signatures; \
             generate a user signet instead"
                .into(),
        ));
    }

    let org_key = Keychain::fetch_sign_key(&args.org_key)?;

    signet.sign_crypto(&org_key)?;
    if matches!(args.stage, StageArg::Full | StageArg::Id) {
        signet.sign_full(&org_key)?;
    }
    if matches!(args.stage, StageArg::Id) {
        let id = args.id.as_deref().ok_or_else(|| {
            SignetError::BadParam("the id stage requires --id <identifier>".into())
        })?;
        signet.sign_id(id.as_bytes(), &org_key)?;
    }

    let out = args.out.as_deref().unwrap_or(&args.input);
    signet.to_file(out)?;
    println!("wrote {}", out.display());
    Ok(())
}
