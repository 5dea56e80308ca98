use std::fs;
use std::io::ErrorKind;

use anyhow::Context;
use moon::*;
use shared::{DashboardConfig, DownMsg, UpMsg};

const CONFIG_FILE_PATH: &str = "dashboard.toml";

// Selected table row, see `frontend::table_view`
const DASHBOARD_STYLES: &str = r#"<style>
    .clicked { border: solid thick; }
</style>"#;

async fn frontend() -> Frontend {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            log::warn!("Using default dashboard config: {:#}", error);
            DashboardConfig::default()
        }
    };

    let mut frontend = Frontend::new()
        .title("PTC-Sim Dashboard")
        .index_by_robots(false)
        .append_to_head(DASHBOARD_STYLES);

    if config.map.api_key.is_empty() {
        log::warn!("map.api_key is empty in {}, the status map will not load", CONFIG_FILE_PATH);
    } else {
        frontend = frontend.append_to_head(&maps_script_tag(&config.map.api_key));
    }
    frontend
}

fn maps_script_tag(api_key: &str) -> String {
    format!(
        r#"<script src="https://maps.googleapis.com/maps/api/js?key={}"></script>"#,
        api_key
    )
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);

    match &req.up_msg {
        UpMsg::LoadConfig => {
            let down_msg = match load_config() {
                Ok(config) => DownMsg::ConfigLoaded(config),
                Err(error) => {
                    log::error!("Failed to load dashboard config: {:#}", error);
                    DownMsg::ConfigError(format!("{:#}", error))
                }
            };
            send_down_msg(down_msg, session_id, cor_id).await;
        }
    }
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        log::debug!("Session disconnected before config reply");
    }
}

/// Reads the dashboard config, creating a default file on first start and
/// persisting any fixes `validate_and_fix` had to make.
fn load_config() -> anyhow::Result<DashboardConfig> {
    let content = match fs::read_to_string(CONFIG_FILE_PATH) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            let mut config = DashboardConfig::default();
            config.validate_and_fix();
            save_config_to_file(&config)?;
            log::info!("Created default {}", CONFIG_FILE_PATH);
            return Ok(config);
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Failed to read {}", CONFIG_FILE_PATH));
        }
    };

    let (config, warnings) = DashboardConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse {}", CONFIG_FILE_PATH))?;

    if !warnings.is_empty() {
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        if let Err(error) = save_config_to_file(&config) {
            log::warn!("Config fixed in memory only: {:#}", error);
        }
    }
    Ok(config)
}

fn save_config_to_file(config: &DashboardConfig) -> anyhow::Result<()> {
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    let content_with_header = format!(
        "# PTC-Sim Dashboard Configuration\n\
         # Refresh cadence, endpoints, map and legend settings for the status page\n\
         \n\
         {}",
        toml_content
    );

    fs::write(CONFIG_FILE_PATH, content_with_header)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_PATH))
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Serving PTC-Sim dashboard");

    start(frontend, up_msg_handler, |_error| {}).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tag_carries_key() {
        let tag = maps_script_tag("abc123");
        assert!(tag.contains("key=abc123"));
        assert!(tag.starts_with("<script"));
    }
}
