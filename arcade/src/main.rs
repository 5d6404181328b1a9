use anyhow::Result;
use arcade::app::ArcadeApp;
use arcade::settings::SettingsStore;
use arcade::{SCREEN_H, SCREEN_W};
use engine::app::{AppConfig, run_app};
use engine::storage::{FileStorage, SaveStore};
use engine::surface::FrameSize;
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = SettingsStore::from_env().load();
    info!(
        "settings: window_scale={} vsync={}",
        settings.window_scale, settings.vsync
    );

    let storage = FileStorage::from_env();
    info!("data dir: {}", storage.dir().display());

    let app = ArcadeApp::new(SaveStore::new(storage));
    let config = AppConfig {
        title: "retrocade".to_string(),
        logical_size: FrameSize::new(SCREEN_W, SCREEN_H),
        window_scale: settings.window_scale,
        vsync: settings.vsync,
    };

    run_app(config, app).map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}
