use chrono::{DateTime, Utc};
use serde::Serialize;
use web3::types::H256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Transient notification shown to the user after an action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Toast {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }
    pub fn success<S: Into<String>>(message: S) -> Self {
        Toast {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }
    pub fn error<S: Into<String>>(message: S) -> Self {
        Toast {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TxKind {
    Approve,
    Action,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DashboardEventContent {
    Toast(Toast),
    ActionStarted {
        action: String,
    },
    TransactionSubmitted {
        action: String,
        kind: TxKind,
        tx_hash: H256,
    },
    TransactionConfirmed {
        action: String,
        kind: TxKind,
        tx_hash: H256,
        success: bool,
    },
    ViewRefreshed {
        view: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEvent {
    pub create_date: DateTime<Utc>,
    pub content: DashboardEventContent,
}

impl DashboardEvent {
    pub fn now(content: DashboardEventContent) -> Self {
        DashboardEvent {
            create_date: Utc::now(),
            content,
        }
    }

    pub fn toast(&self) -> Option<&Toast> {
        match &self.content {
            DashboardEventContent::Toast(toast) => Some(toast),
            _ => None,
        }
    }
}
