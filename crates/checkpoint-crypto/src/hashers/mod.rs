mod direct;
pub use direct::DirectHasher;

/// Byte-level message expansion: a compression step followed by an extendable output step.
/// The output of `hash` is what gets split into limb groups.
pub trait Hasher {
    type Error;

    /// Compresses `message` under `domain`. The requested expansion length is bound into the
    /// digest, so expansions of different lengths never share a prefix.
    fn crh(&self, domain: &[u8], message: &[u8], output_len: usize)
        -> Result<Vec<u8>, Self::Error>;

    /// Expands a compressed message to `output_len` bytes
    fn xof(&self, domain: &[u8], digest: &[u8], output_len: usize)
        -> Result<Vec<u8>, Self::Error>;

    /// `xof(crh(message))`
    fn hash(&self, domain: &[u8], message: &[u8], output_len: usize) -> Result<Vec<u8>, Self::Error> {
        let digest = self.crh(domain, message, output_len)?;
        self.xof(domain, &digest, output_len)
    }
}
