use qanun_config::Config;
use qanun_types::Mode;

pub(crate) fn run_tui(mut config: Config, mode: Option<Mode>) -> anyhow::Result<()> {
    if let Some(mode) = mode {
        config.mode = Some(mode);
    }
    qanun_tui::run_tui(&config)
}
