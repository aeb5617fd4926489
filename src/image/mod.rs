pub mod draw;
pub mod frame;
pub mod gray;
pub mod io;

pub use self::frame::{Frame, PixelFormat};
pub use self::gray::GrayImage;
