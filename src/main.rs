use anyhow::{Context as _, Result};
use clap::Parser;
use pcp_generator::utils::logging;
use pcp_generator::{App, Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置，命令行参数优先
    let mut config = Config::from_env().context("加载配置失败")?;
    cli.apply_to(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let document = App::initialize(config).await?.run().await?;

    if cli.print {
        println!("{}", document.content());
    }

    Ok(())
}
