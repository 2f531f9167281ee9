use rand_core::RngCore;

use shared::error::AppError;

use crate::time::Delay;

/// How long the simulated mobile pairing takes to "scan" the QR.
pub const PAIRING_DELAY_MS: u64 = 1_200;

/// Chain id reported by the simulated wallet.
pub const SIMULATED_CHAIN_ID: u64 = 1;

/// Connected account as reported by a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub address: String,
    pub chain_id: u64,
}

/// Notifications a wallet provider may emit after connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(u64),
}

/// Seam over the wallet integration.
///
/// The shipped implementation fabricates everything; the trait keeps the
/// shape an injected browser-style provider would need.
pub trait WalletProvider {
    /// Pairing URI to display as a QR before `connect`, when the provider
    /// pairs through one.
    fn pairing_uri(&mut self) -> Option<String>;

    /// Request account access and return the active session.
    fn connect(&mut self) -> Result<WalletSession, AppError>;

    /// Drain the next pending provider notification, if any.
    fn poll_event(&mut self) -> Option<WalletEvent>;
}

/// Wallet that simulates the QR-pairing flow: shows a fabricated pairing
/// URI, waits out the pairing delay, and reports a fabricated address.
pub struct SimulatedWallet<R, D> {
    rng: R,
    delay: D,
    chain_id: u64,
}

impl<R: RngCore, D: Delay> SimulatedWallet<R, D> {
    pub fn new(rng: R, delay: D) -> Self {
        Self {
            rng,
            delay,
            chain_id: SIMULATED_CHAIN_ID,
        }
    }
}

impl<R: RngCore, D: Delay> WalletProvider for SimulatedWallet<R, D> {
    fn pairing_uri(&mut self) -> Option<String> {
        let topic = hex_string(&mut self.rng, 32);
        let key = hex_string(&mut self.rng, 32);
        Some(format!("wc:{topic}@2?relay-protocol=irn&symKey={key}"))
    }

    fn connect(&mut self) -> Result<WalletSession, AppError> {
        self.delay.sleep_ms(PAIRING_DELAY_MS);
        Ok(WalletSession {
            address: fabricate_address(&mut self.rng),
            chain_id: self.chain_id,
        })
    }

    fn poll_event(&mut self) -> Option<WalletEvent> {
        None
    }
}

/// Fabricated `0x`-prefixed address with 40 hex characters.
pub fn fabricate_address(rng: &mut dyn RngCore) -> String {
    format!("0x{}", hex_string(rng, 20))
}

/// Display form of an address: `0x1234…abcd`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

fn hex_string(rng: &mut dyn RngCore, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill_bytes(&mut buf);
    buf.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use crate::time::NoopDelay;

    use super::*;

    #[test]
    fn fabricated_address_has_prefix_and_length() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let address = fabricate_address(&mut rng);
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
        assert!(address[2..].bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn connect_is_deterministic_for_a_seed() {
        let mut first = SimulatedWallet::new(ChaCha20Rng::from_seed([9u8; 32]), NoopDelay);
        let mut second = SimulatedWallet::new(ChaCha20Rng::from_seed([9u8; 32]), NoopDelay);
        first.pairing_uri();
        second.pairing_uri();
        let a = first.connect().expect("connect");
        let b = second.connect().expect("connect");
        assert_eq!(a, b);
        assert_eq!(a.chain_id, SIMULATED_CHAIN_ID);
    }

    #[test]
    fn pairing_uri_looks_like_a_wallet_connect_uri() {
        let mut wallet = SimulatedWallet::new(ChaCha20Rng::from_seed([2u8; 32]), NoopDelay);
        let uri = wallet.pairing_uri().expect("pairing uri");
        assert!(uri.starts_with("wc:"));
        assert!(uri.contains("symKey="));
    }

    #[test]
    fn short_address_truncates_the_middle() {
        let shortened = short_address("0x742d35Cc6634C0532925a3b8D4C0d8fB2C4D4d4d");
        assert_eq!(shortened, "0x742d…4d4d");
    }
}
