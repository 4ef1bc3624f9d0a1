#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use histoscope_image as image;

#[doc(inline)]
pub use histoscope_imgproc as imgproc;
