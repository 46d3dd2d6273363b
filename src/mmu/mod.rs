pub mod bus;
pub mod interceptor;
pub mod memory_trait;
pub mod mmio;

pub use bus::Bus;
pub use interceptor::WriteInterceptor;
pub use memory_trait::Memory;
pub use mmio::MmioDevice;
