pub mod clock;
pub mod storage;

pub use clock::SystemClock;
