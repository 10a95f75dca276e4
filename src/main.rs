use reelvault::{Config, run};

fn main() -> anyhow::Result<()> {
    // Worker count comes from config, so .env has to be applied first
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    runtime.enable_all().thread_name("reelvault-worker");
    if config.general.worker_threads > 0 {
        runtime.worker_threads(config.general.worker_threads);
    }

    runtime.build()?.block_on(run(config))
}
