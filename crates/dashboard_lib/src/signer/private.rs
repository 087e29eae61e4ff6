use crate::eth::get_eth_addr_from_secret;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use lazy_static::lazy_static;
use secp256k1::SecretKey;
use web3::transports::Http;
use web3::Web3;

use super::{Signer, SignerError};
use web3::types::{SignedTransaction, TransactionParameters, H160};

lazy_static! {
    // signing is done offline, the transport is never used
    static ref OFFLINE_SIGNING_PROVIDER: Web3<Http> = {
        let transport = web3::transports::Http::new("http://noconn").unwrap();
        Web3::new(transport)
    };
}

/// PrivateKeySigner is implementation of Signer trait that stores private keys in memory and use
/// them to sign transactions matching them by public addresses
pub struct PrivateKeySigner {
    secret_keys: Vec<SecretKey>,
}

impl PrivateKeySigner {
    pub fn new(secret_keys: Vec<SecretKey>) -> Self {
        Self { secret_keys }
    }

    fn get_private_key(&self, pub_address: H160) -> Result<&SecretKey, SignerError> {
        self.secret_keys
            .iter()
            .find(|sk| get_eth_addr_from_secret(sk) == pub_address)
            .ok_or(SignerError {
                message: format!("Failed to find private key for address: {pub_address:#x}"),
            })
    }
}

impl Signer for PrivateKeySigner {
    fn check_if_sign_possible(&self, pub_address: H160) -> BoxFuture<'_, Result<(), SignerError>> {
        async move {
            self.get_private_key(pub_address)?;
            Ok(())
        }
        .boxed()
    }

    fn sign(
        &self,
        pub_address: H160,
        tp: TransactionParameters,
    ) -> BoxFuture<'_, Result<SignedTransaction, SignerError>> {
        async move {
            let secret_key = self.get_private_key(pub_address)?;
            let signed = OFFLINE_SIGNING_PROVIDER
                .accounts()
                .sign_transaction(tp, secret_key)
                .await
                .map_err(|err| SignerError {
                    message: format!("Error when signing transaction in PrivateKeySigner {err}"),
                })?;
            Ok(signed)
        }
        .boxed()
    }

    fn sign_message(
        &self,
        pub_address: H160,
        message: Vec<u8>,
    ) -> BoxFuture<'_, Result<Vec<u8>, SignerError>> {
        async move {
            let secret_key = self.get_private_key(pub_address)?;
            let signed = OFFLINE_SIGNING_PROVIDER
                .accounts()
                .sign(message, secret_key);
            Ok(signed.signature.0)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_sign_message_with_known_key() {
        let sk =
            SecretKey::from_str("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        let address = get_eth_addr_from_secret(&sk);
        let signer = PrivateKeySigner::new(vec![sk]);

        signer.check_if_sign_possible(address).await.unwrap();
        let signature = signer
            .sign_message(address, b"login".to_vec())
            .await
            .unwrap();
        assert_eq!(signature.len(), 65);

        let other = H160::from_low_u64_be(5);
        let err = signer.check_if_sign_possible(other).await.unwrap_err();
        assert!(err.message.contains("0x0000000000000000000000000000000000000005"));
    }
}
