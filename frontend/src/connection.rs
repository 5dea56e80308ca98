use futures::future::{self, Either};
use futures::stream::{Stream, StreamExt};
use shared::{DashboardConfig, DownMsg, UpMsg};
use zoon::*;

const CONFIG_REPLY_TIMEOUT_MS: u32 = 3000;

/// Forwards every `DownMsg` into a stream.
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl Stream<Item = DownMsg> + Unpin) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        (ConnectionAdapter { connection }, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) {
        if let Err(error) = self.connection.send_up_msg(up_msg).await {
            zoon::println!("Failed to send message: {:?}", error);
        }
    }
}

/// Asks the backend for `dashboard.toml`. Any failure falls back to defaults
/// so the dashboard still runs against the standard endpoints.
pub async fn load_dashboard_config() -> DashboardConfig {
    let (connection, mut down_msgs) = ConnectionAdapter::new();
    connection.send_up_msg(UpMsg::LoadConfig).await;

    let reply = Box::pin(down_msgs.next());
    let timeout = Box::pin(Timer::sleep(CONFIG_REPLY_TIMEOUT_MS));

    match future::select(reply, timeout).await {
        Either::Left((Some(DownMsg::ConfigLoaded(config)), _)) => config,
        Either::Left((Some(DownMsg::ConfigError(error)), _)) => {
            zoon::eprintln!("Backend config error, using defaults: {}", error);
            DashboardConfig::default()
        }
        Either::Left((None, _)) => {
            zoon::eprintln!("Connection closed before config arrived, using defaults");
            DashboardConfig::default()
        }
        Either::Right(_) => {
            zoon::eprintln!("No config after {}ms, using defaults", CONFIG_REPLY_TIMEOUT_MS);
            DashboardConfig::default()
        }
    }
}
