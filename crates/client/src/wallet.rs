//! The boundary to the wallet-connection library.

use alloy_chains::NamedChain;
use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes, ChainId, TxHash};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("no wallet attached to the frame")]
    NoWallet,
    #[error("wallet is not connected")]
    NotConnected,
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("chain {0} is not supported by the wallet")]
    UnsupportedChain(ChainId),
    #[error("{0}")]
    Other(String),
}

/// Account as currently reported by the wallet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountState {
    pub address: Option<Address>,
    pub is_connected: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Wallet state and actions, owned by the wallet library.
///
/// The frame only reads the state and forwards actions, it never caches the account.
#[async_trait]
pub trait WalletConnector: Send + Sync + 'static {
    fn account(&self) -> AccountState;

    fn chain_id(&self) -> ChainId;

    async fn connect(&self) -> Result<AccountState, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Submits the transaction and returns its hash without waiting for inclusion.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError>;

    async fn wait_for_transaction_receipt(&self, hash: TxHash)
    -> Result<ReceiptStatus, WalletError>;

    /// Signs `message` with `personal_sign`.
    async fn sign_message(&self, message: &str) -> Result<Bytes, WalletError>;

    /// Signs EIP-712 typed data.
    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, WalletError>;

    /// Switches the active chain and returns the chain the wallet ended up on.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<ChainId, WalletError>;
}

/// Chain to switch to from `current`: Optimism when on Base, Base otherwise.
pub fn toggle_chain_target(current: ChainId) -> ChainId {
    if current == NamedChain::Base as u64 {
        NamedChain::Optimism as u64
    } else {
        NamedChain::Base as u64
    }
}

/// Progress of a single wallet action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error(String),
}

impl ActionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn from_result<T>(result: &Result<T, WalletError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => Self::Error(err.to_string()),
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Pending => f.write_str("pending"),
            Self::Success => f.write_str("success"),
            Self::Error(err) => write!(f, "error: {err}"),
        }
    }
}

/// Status of the most recently sent transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransactionStatus {
    #[default]
    None,
    Confirming,
    Confirmed,
    Failed(String),
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Confirming => f.write_str("confirming"),
            Self::Confirmed => f.write_str("confirmed"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}
