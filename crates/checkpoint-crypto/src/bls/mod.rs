//! BLS signatures over BLS12-377, with signatures in G1 and public keys in G2, following
//! <https://crypto.stanford.edu/~dabo/pubs/papers/BLSmultisig.html>.

mod secret;
pub use secret::PrivateKey;

mod public;
pub use public::PublicKey;

mod signature;
pub use signature::Signature;
