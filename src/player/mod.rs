//! 演示用的宿主实现：rodio 播放器与无声的模拟播放器

mod null_host;
mod registry;
mod rodio_host;

pub use null_host::NullHost;
pub use registry::CommandRegistry;
pub use rodio_host::RodioHost;
