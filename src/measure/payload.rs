use bytes::{Bytes, BytesMut};
use rand::{RngCore, SeedableRng, rngs::SmallRng};

pub(super) const CHUNK_SIZE: usize = 64 * 1024;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Synthetic upload body, generated once and shared read-only by every
/// upload connection of a session.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    data: Bytes,
}

impl UploadPayload {
    /// Fills `size` bytes of random alphanumeric text, one chunk at a time,
    /// yielding to the runtime between chunks so the caller can abandon it.
    pub async fn generate(size: usize) -> Self {
        let mut rng = SmallRng::from_entropy();
        let mut buf = BytesMut::zeroed(size);
        for chunk in buf.chunks_mut(CHUNK_SIZE) {
            rng.fill_bytes(chunk);
            for byte in chunk.iter_mut() {
                *byte = ALPHABET[usize::from(*byte) % ALPHABET.len()];
            }
            tokio::task::yield_now().await;
        }
        Self { data: buf.freeze() }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Zero-copy chunks of the body, in order.
    pub fn chunks(&self) -> impl Iterator<Item = Bytes> + Send + Sync + 'static {
        let data = self.data.clone();
        (0..data.len())
            .step_by(CHUNK_SIZE)
            .map(move |start| data.slice(start..(start + CHUNK_SIZE).min(data.len())))
    }
}

impl From<Bytes> for UploadPayload {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}
