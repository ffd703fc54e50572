use clap::Parser;
use dime_signet::{verify_chain_of_custody, Signet};
use dime_types::error::SignetError;
use dime_types::state::SignetState;
use dime_types::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Input signet PEM file.
    #[clap(long = "in")]
    pub input: PathBuf,

    /// Organizational signet anchoring the cascade; required to lift a user
    /// signet past the SSR stage.
    #[clap(long = "org-key")]
    pub org_key: Option<PathBuf>,

    /// Predecessor user signet for chain-of-custody verification.
    #[clap(long = "previous")]
    pub previous: Option<PathBuf>,
}

pub fn run(args: VerifyArgs) -> Result<()> {
    let signet = Signet::from_file(&args.input)?;
    let org_pok = match &args.org_key {
        Some(path) => Some(Signet::from_file(path)?.pok()?),
        None => None,
    };

    let state = match &args.previous {
        Some(path) => {
            let pok = org_pok.as_ref().ok_or_else(|| {
                SignetError::BadParam("chain-of-custody verification requires --org-key".into())
            })?;
            let previous = Signet::from_file(path)?;
            verify_chain_of_custody(&previous, &signet, pok)
        }
        None => signet.full_verify(org_pok.as_ref(), None),
    };

    log::debug!("classified {} as {}", args.input.display(), state);
    println!("{}", state);
    match state {
        _ if state.is_valid() => Ok(()),
        SignetState::Incomplete => Err(SignetError::Incomplete(
            "required fields are absent".into(),
        )),
        SignetState::Invalid | SignetState::BrokenCoc => Err(SignetError::Crypto(format!(
            "signature verification failed ({})",
            state
        ))),
        _ => Err(SignetError::Format(format!("structural failure ({})", state))),
    }
}
