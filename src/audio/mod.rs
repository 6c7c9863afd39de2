// Audio module - sample buffering between the capture callback and the consumer

pub mod callback;
pub mod ring_buffer;
pub mod transport;
pub mod window;

// Re-export commonly used types for convenience
pub use callback::CaptureCallback;
pub use ring_buffer::RingBuffer;
pub use transport::{SampleConsumer, SampleProducer, TransportSnapshot, TransportStats};
pub use window::{ExtractMode, WindowExtractor};
