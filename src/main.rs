use anyhow::Context;
use clap::Parser;
use glass_estimate::{cli, commands, config, logging};
use cli::Cli;
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load().context("設定ファイルを読み込めませんでした")?;

    match commands::execute(cli.command, &mut config, cli.data_dir.as_deref()) {
        Ok(()) => Ok(()),
        Err(e) if e.is_store_failure() => {
            tracing::error!(error = %e, "store operation failed");
            Err(anyhow::anyhow!("見積書データの読み書きに失敗しました"))
        }
        Err(e) => Err(e.into()),
    }
}
