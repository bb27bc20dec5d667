use anyhow::Context;
use sandbox3d::{config::SandboxConfig, SandboxApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SandboxConfig::from_env();
    match &config.assets.model_path {
        Some(path) => log::info!("Importing model from {}", path.display()),
        None => log::info!("No model configured, starting with primitives only"),
    }

    let app = SandboxApp::new(config).context("failed to start the sandbox")?;
    app.run().context("sandbox exited with an error")?;
    Ok(())
}
