use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let args = qif_reconcile::args::parse();
    qif_reconcile::cli::main(args)
}
