use clap::Parser;
use dime_signet::Signet;
use dime_types::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Input signet PEM file.
    #[clap(long = "in")]
    pub input: PathBuf,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let signet = Signet::from_file(&args.input)?;
    let mut stdout = std::io::stdout().lock();
    signet.dump(&mut stdout)
}
