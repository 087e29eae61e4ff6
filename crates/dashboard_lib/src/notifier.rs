use dashboard_lib_common::{DashboardEvent, DashboardEventContent, Toast, TxKind};
use web3::types::H256;

/// Delivers dashboard events to whoever renders them. Without a channel events are only logged.
#[derive(Clone, Default)]
pub struct Notifier {
    event_sender: Option<tokio::sync::mpsc::Sender<DashboardEvent>>,
}

impl Notifier {
    pub fn new(event_sender: Option<tokio::sync::mpsc::Sender<DashboardEvent>>) -> Self {
        Self { event_sender }
    }

    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<DashboardEvent>) {
        let (sender, receiver) = tokio::sync::mpsc::channel(buffer);
        (Self::new(Some(sender)), receiver)
    }

    pub async fn send(&self, content: DashboardEventContent) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(DashboardEvent::now(content)).await {
                log::error!("Error sending event: {}", e);
            }
        }
    }

    pub async fn toast(&self, toast: Toast) {
        log::info!("[toast:{:?}] {}", toast.level, toast.message);
        self.send(DashboardEventContent::Toast(toast)).await;
    }

    pub async fn action_started(&self, action: &str) {
        self.send(DashboardEventContent::ActionStarted {
            action: action.to_string(),
        })
        .await;
    }

    pub async fn tx_submitted(&self, action: &str, kind: TxKind, tx_hash: H256) {
        self.send(DashboardEventContent::TransactionSubmitted {
            action: action.to_string(),
            kind,
            tx_hash,
        })
        .await;
    }

    pub async fn tx_confirmed(&self, action: &str, kind: TxKind, tx_hash: H256, success: bool) {
        self.send(DashboardEventContent::TransactionConfirmed {
            action: action.to_string(),
            kind,
            tx_hash,
            success,
        })
        .await;
    }

    pub async fn view_refreshed(&self, view: &str) {
        self.send(DashboardEventContent::ViewRefreshed {
            view: view.to_string(),
        })
        .await;
    }
}
