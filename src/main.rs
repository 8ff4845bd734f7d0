use {
    anyhow::Result,
    clap::Parser,
    dqn_cartpole::cli::{
        run,
        Args,
    },
};


fn main() -> Result<()> {
    run(Args::parse())
}
